//! Peripheral hooks driven by real instructions.

use std::sync::{Arc, Mutex};

use motorola_6809::{Hooks, Mc6809, Memory};

type Accesses = Arc<Mutex<Vec<(u64, u16, u16, u8)>>>;

/// Memory with a status register at $A000 and a data register at $A001.
fn hooked_memory(reads: &Accesses, writes: &Accesses) -> Memory {
    let reads = Arc::clone(reads);
    let writes = Arc::clone(writes);
    Memory::with_hooks(
        Hooks::new()
            .on_read(0xA000, move |cycles, pc, addr| {
                reads.lock().unwrap().push((cycles, pc, addr, 0x03));
                0x03
            })
            .on_write(0xA001, move |cycles, pc, addr, value| {
                writes.lock().unwrap().push((cycles, pc, addr, value));
            }),
    )
}

#[test]
fn hooks_see_cycles_before_the_instruction_and_its_address() {
    let reads = Accesses::default();
    let writes = Accesses::default();
    let mut memory = hooked_memory(&reads, &writes);

    #[rustfmt::skip]
    memory.load(0x0100, &[
        0x86, 0xA3,       // 0100: LDA #$A3   (2)
        0x12,             // 0102: NOP        (2)
        0xB7, 0xA0, 0x01, // 0103: STA $A001  (5)
        0xF6, 0xA0, 0x00, // 0106: LDB $A000  (5)
    ]);
    let mut cpu = Mc6809::new();
    cpu.regs_mut().pc = 0x0100;

    for _ in 0..4 {
        cpu.step(&mut memory).unwrap();
    }

    assert_eq!(*writes.lock().unwrap(), vec![(4, 0x0103, 0xA001, 0xA3)]);
    assert_eq!(*reads.lock().unwrap(), vec![(9, 0x0106, 0xA000, 0x03)]);
    assert_eq!(cpu.regs().b, 0x03);
    assert_eq!(memory.peek(0xA001), 0x00);
    assert_eq!(cpu.total_cycles().get(), 14);
}

#[test]
fn hook_cycles_continue_across_a_bounded_run() {
    let reads = Accesses::default();
    let writes = Accesses::default();
    let mut memory = hooked_memory(&reads, &writes);

    #[rustfmt::skip]
    memory.load(0x0200, &[
        0xC6, 0x03,       // 0200: LDB #3      (2)
        0xB7, 0xA0, 0x01, // 0202: LOOP STA $A001 (5)
        0x4C,             // 0205: INCA        (2)
        0x5A,             // 0206: DECB        (2)
        0x26, 0xF9,       // 0207: BNE LOOP    (3)
    ]);
    let mut cpu = Mc6809::new();
    cpu.run(&mut memory, 0x0200, Some(0x0209), 100).unwrap();

    // Each pass adds 12 cycles
    assert_eq!(
        *writes.lock().unwrap(),
        vec![
            (2, 0x0202, 0xA001, 0x00),
            (14, 0x0202, 0xA001, 0x01),
            (26, 0x0202, 0xA001, 0x02),
        ]
    );
    assert!(reads.lock().unwrap().is_empty());
}

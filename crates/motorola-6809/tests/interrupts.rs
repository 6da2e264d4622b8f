//! Hardware interrupts, software interrupts, RTI and the CWAI/SYNC waits.

use emu_core::{Cpu, SimpleBus};
use motorola_6809::flags::{E, F, I};
use motorola_6809::{
    ConditionCodes, ExecState, FIRQ_VECTOR, IRQ_VECTOR, InterruptLine, Mc6809, NMI_VECTOR,
    RESET_VECTOR, SWI_VECTOR, SWI2_VECTOR, SWI3_VECTOR,
};

const FIRQ_HANDLER: u16 = 0x2000;
const IRQ_HANDLER: u16 = 0x3000;
const NMI_HANDLER: u16 = 0x4000;
const SWI_HANDLER: u16 = 0x5000;

/// CPU at $0100 with S = $1000, CC = 0, every vector set and an RTI at
/// each handler.
fn setup(program: &[u8]) -> (Mc6809, SimpleBus) {
    let mut bus = SimpleBus::new();
    for (vector, handler) in [
        (FIRQ_VECTOR, FIRQ_HANDLER),
        (IRQ_VECTOR, IRQ_HANDLER),
        (NMI_VECTOR, NMI_HANDLER),
        (SWI_VECTOR, SWI_HANDLER),
        (SWI2_VECTOR, 0x5200),
        (SWI3_VECTOR, 0x5300),
        (RESET_VECTOR, 0xC000),
    ] {
        bus.load(vector, &handler.to_be_bytes());
        bus.poke(handler, 0x3B); // RTI
    }
    bus.load(0x0100, program);

    let mut cpu = Mc6809::new();
    cpu.regs_mut().pc = 0x0100;
    cpu.regs_mut().s = 0x1000;
    cpu.regs_mut().u = 0x2000;
    (cpu, bus)
}

fn stacked_word(bus: &SimpleBus, address: u16) -> u16 {
    u16::from_be_bytes([bus.peek(address), bus.peek(address + 1)])
}

#[test]
fn irq_stacks_entire_state() {
    let (mut cpu, mut bus) = setup(&[0x12]);
    cpu.regs_mut().a = 0x11;
    cpu.regs_mut().x = 0x3344;
    cpu.assert_line(InterruptLine::Irq);

    assert_eq!(cpu.step(&mut bus), Ok(19));
    assert_eq!(cpu.regs().pc, IRQ_HANDLER);
    assert_eq!(cpu.regs().s, 0x1000 - 12);
    assert!(cpu.regs().cc.is_set(I | E));
    assert!(!cpu.regs().cc.is_set(F));
    assert!(!cpu.pending().irq);

    // CC, A, B, DP, X, Y, U, PC from the top of the stack
    assert_ne!(bus.peek(0x0FF4) & E, 0);
    assert_eq!(bus.peek(0x0FF5), 0x11);
    assert_eq!(stacked_word(&bus, 0x0FF8), 0x3344);
    assert_eq!(stacked_word(&bus, 0x0FFC), 0x2000);
    assert_eq!(stacked_word(&bus, 0x0FFE), 0x0100);
}

#[test]
fn masked_irq_stays_pending() {
    let (mut cpu, mut bus) = setup(&[0x12, 0x1C, 0xEF, 0x12]);
    cpu.regs_mut().cc = ConditionCodes(I);
    cpu.assert_line(InterruptLine::Irq);

    // NOP runs, IRQ still latched
    assert_eq!(cpu.step(&mut bus), Ok(2));
    assert_eq!(cpu.regs().pc, 0x0101);
    assert!(cpu.pending().irq);

    // ANDCC #$EF unmasks it, taken before the next instruction
    assert_eq!(cpu.step(&mut bus), Ok(3));
    assert_eq!(cpu.step(&mut bus), Ok(19));
    assert_eq!(cpu.regs().pc, IRQ_HANDLER);
    assert_eq!(stacked_word(&bus, 0x0FFE), 0x0103);
}

#[test]
fn released_line_is_not_taken() {
    let (mut cpu, mut bus) = setup(&[0x12]);
    cpu.assert_line(InterruptLine::Irq);
    cpu.release_line(InterruptLine::Irq);
    assert_eq!(cpu.step(&mut bus), Ok(2));
    assert_eq!(cpu.regs().pc, 0x0101);
}

#[test]
fn firq_and_fast_return() {
    let (mut cpu, mut bus) = setup(&[0x12]);
    cpu.regs_mut().a = 0x55;
    cpu.assert_line(InterruptLine::Firq);

    assert_eq!(cpu.step(&mut bus), Ok(10));
    assert_eq!(cpu.regs().pc, FIRQ_HANDLER);
    assert_eq!(cpu.regs().s, 0x1000 - 3);
    assert!(cpu.regs().cc.is_set(I | F));
    assert!(!cpu.regs().cc.is_set(E));

    // RTI with E clear pulls CC and PC only
    cpu.regs_mut().a = 0;
    assert_eq!(cpu.step(&mut bus), Ok(6));
    assert_eq!(cpu.regs().pc, 0x0100);
    assert_eq!(cpu.regs().s, 0x1000);
    assert_eq!(cpu.regs().cc.bits(), 0);
    assert_eq!(cpu.regs().a, 0);
}

#[test]
fn nmi_ignores_masks() {
    let (mut cpu, mut bus) = setup(&[0x12]);
    cpu.regs_mut().cc = ConditionCodes(I | F);
    cpu.assert_line(InterruptLine::Irq);
    cpu.assert_line(InterruptLine::Nmi);

    assert_eq!(cpu.step(&mut bus), Ok(19));
    assert_eq!(cpu.regs().pc, NMI_HANDLER);
    assert!(!cpu.pending().nmi);
    assert!(cpu.pending().irq);
}

#[test]
fn full_return_restores_every_register() {
    let (mut cpu, mut bus) = setup(&[0x12]);
    cpu.regs_mut().a = 0x01;
    cpu.regs_mut().b = 0x02;
    cpu.regs_mut().dp = 0x03;
    cpu.regs_mut().x = 0x0405;
    cpu.regs_mut().y = 0x0607;
    let before = *cpu.regs();
    cpu.assert_line(InterruptLine::Irq);
    cpu.step(&mut bus).unwrap();

    // Handler clobbers everything before its RTI
    cpu.regs_mut().a = 0xFF;
    cpu.regs_mut().b = 0xFF;
    cpu.regs_mut().dp = 0xFF;
    cpu.regs_mut().x = 0xFFFF;
    cpu.regs_mut().y = 0xFFFF;
    cpu.regs_mut().u = 0xFFFF;

    assert_eq!(cpu.step(&mut bus), Ok(15));
    let after = *cpu.regs();
    assert_eq!(after.cc.bits(), E);
    assert_eq!(
        (after.a, after.b, after.dp, after.x, after.y, after.u, after.s, after.pc),
        (before.a, before.b, before.dp, before.x, before.y, before.u, before.s, before.pc)
    );
}

#[test]
fn cwai_waits_then_vectors_without_pushing_again() {
    // CWAI #$EF; NOP
    let (mut cpu, mut bus) = setup(&[0x3C, 0xEF, 0x12]);
    cpu.regs_mut().cc = ConditionCodes(I);

    assert_eq!(cpu.step(&mut bus), Ok(21));
    assert_eq!(cpu.exec_state(), ExecState::WaitingForInterrupt);
    assert!(cpu.is_halted());
    assert_eq!(cpu.regs().s, 0x1000 - 12);
    assert_eq!(cpu.regs().pc, 0x0102);
    assert_eq!(bus.peek(0x0FF4), E);

    // Nothing pending: one-cycle polls
    assert_eq!(cpu.step(&mut bus), Ok(1));
    assert_eq!(cpu.step(&mut bus), Ok(1));
    assert_eq!(cpu.regs().pc, 0x0102);

    cpu.assert_line(InterruptLine::Irq);
    assert_eq!(cpu.step(&mut bus), Ok(3));
    assert_eq!(cpu.exec_state(), ExecState::Running);
    assert_eq!(cpu.regs().pc, IRQ_HANDLER);
    assert_eq!(cpu.regs().s, 0x1000 - 12);
    assert!(cpu.regs().cc.is_set(I));

    // RTI resumes after the CWAI
    assert_eq!(cpu.step(&mut bus), Ok(15));
    assert_eq!(cpu.regs().pc, 0x0102);
    assert_eq!(cpu.regs().s, 0x1000);
    assert_eq!(cpu.regs().cc.bits(), E);
}

#[test]
fn cwai_fe_then_irq_pushes_one_frame() {
    // CWAI #$FE; NOP
    let (mut cpu, mut bus) = setup(&[0x3C, 0xFE, 0x12]);
    cpu.regs_mut().a = 0x11;
    cpu.regs_mut().x = 0x2233;

    assert_eq!(cpu.step(&mut bus), Ok(21));
    assert_eq!(cpu.regs().s, 0x1000 - 12);
    assert_eq!(bus.peek(0x0FF4), E);
    assert_eq!(bus.peek(0x0FF5), 0x11);
    assert_eq!(stacked_word(&bus, 0x0FFE), 0x0102);

    cpu.assert_line(InterruptLine::Irq);
    assert_eq!(cpu.step(&mut bus), Ok(3));
    assert_eq!(cpu.regs().pc, IRQ_HANDLER);
    assert_eq!(cpu.regs().cc.bits(), E | I);
    assert_eq!(cpu.regs().s, 0x1000 - 12);
    assert!(!cpu.pending().irq);

    assert_eq!(cpu.step(&mut bus), Ok(15));
    assert_eq!(cpu.regs().pc, 0x0102);
    assert_eq!(cpu.regs().s, 0x1000);
    assert_eq!(cpu.regs().x, 0x2233);
}

#[test]
fn cwai_ignores_masked_lines() {
    // CWAI #$FF leaves I set
    let (mut cpu, mut bus) = setup(&[0x3C, 0xFF]);
    cpu.regs_mut().cc = ConditionCodes(I);
    cpu.step(&mut bus).unwrap();

    cpu.assert_line(InterruptLine::Irq);
    assert_eq!(cpu.step(&mut bus), Ok(1));
    assert_eq!(cpu.exec_state(), ExecState::WaitingForInterrupt);

    cpu.assert_line(InterruptLine::Nmi);
    assert_eq!(cpu.step(&mut bus), Ok(3));
    assert_eq!(cpu.regs().pc, NMI_HANDLER);
}

#[test]
fn sync_resumes_on_masked_line() {
    // SYNC; NOP
    let (mut cpu, mut bus) = setup(&[0x13, 0x12]);
    cpu.regs_mut().cc = ConditionCodes(I);

    assert_eq!(cpu.step(&mut bus), Ok(2));
    assert_eq!(cpu.exec_state(), ExecState::Syncing);
    assert_eq!(cpu.step(&mut bus), Ok(1));

    // Masked IRQ ends the wait; NOP executes in the same step
    cpu.assert_line(InterruptLine::Irq);
    assert_eq!(cpu.step(&mut bus), Ok(2));
    assert_eq!(cpu.exec_state(), ExecState::Running);
    assert_eq!(cpu.regs().pc, 0x0102);
    assert!(cpu.pending().irq);
}

#[test]
fn sync_takes_unmasked_line() {
    let (mut cpu, mut bus) = setup(&[0x13, 0x12]);
    cpu.step(&mut bus).unwrap();

    cpu.assert_line(InterruptLine::Firq);
    assert_eq!(cpu.step(&mut bus), Ok(10));
    assert_eq!(cpu.exec_state(), ExecState::Running);
    assert_eq!(cpu.regs().pc, FIRQ_HANDLER);
    assert_eq!(stacked_word(&bus, 0x0FFE), 0x0101);
}

#[test]
fn swi_masks_both_lines() {
    let (mut cpu, mut bus) = setup(&[0x3F]);
    assert_eq!(cpu.step(&mut bus), Ok(19));
    assert_eq!(cpu.regs().pc, SWI_HANDLER);
    assert_eq!(cpu.regs().s, 0x1000 - 12);
    assert_eq!(cpu.regs().cc.bits(), E | F | I);
    assert_eq!(stacked_word(&bus, 0x0FFE), 0x0101);

    assert_eq!(cpu.step(&mut bus), Ok(15));
    assert_eq!(cpu.regs().pc, 0x0101);
}

#[test]
fn swi2_and_swi3_leave_masks_alone() {
    let (mut cpu, mut bus) = setup(&[0x10, 0x3F]);
    assert_eq!(cpu.step(&mut bus), Ok(20));
    assert_eq!(cpu.regs().pc, 0x5200);
    assert_eq!(cpu.regs().cc.bits(), E);
    assert_eq!(stacked_word(&bus, 0x0FFE), 0x0102);

    let (mut cpu, mut bus) = setup(&[0x11, 0x3F]);
    assert_eq!(cpu.step(&mut bus), Ok(20));
    assert_eq!(cpu.regs().pc, 0x5300);
    assert_eq!(cpu.regs().cc.bits(), E);
}

#[test]
fn undocumented_reset_opcode_uses_reset_vector() {
    let (mut cpu, mut bus) = setup(&[0x3E]);
    assert_eq!(cpu.step(&mut bus), Ok(19));
    assert_eq!(cpu.regs().pc, 0xC000);
    assert!(cpu.regs().cc.is_set(I | F));
    assert_eq!(cpu.regs().s, 0x1000 - 12);
}

#[test]
fn cpu_trait_reports_whether_irq_is_accepted() {
    let (mut cpu, mut bus) = setup(&[0x12]);
    assert!(cpu.interrupt());
    cpu.regs_mut().cc = ConditionCodes(I);
    assert!(!cpu.interrupt());

    cpu.nmi();
    assert_eq!(Cpu::step(&mut cpu, &mut bus), Ok(19));
    assert_eq!(Cpu::pc(&cpu), u32::from(NMI_HANDLER));
}

//! Instruction behaviour that fixtures cannot express: errors, illegal
//! opcode policies, stack round trips and bounded runs.

use emu_core::{Observable, SimpleBus, Value};
use motorola_6809::{
    ConditionCodes, CpuError, IllegalOpcodePolicy, Mc6809, RunConfig, StopReason,
};

fn setup(program: &[u8]) -> (Mc6809, SimpleBus) {
    let mut bus = SimpleBus::new();
    bus.load(0x0100, program);
    let mut cpu = Mc6809::new();
    cpu.regs_mut().pc = 0x0100;
    cpu.regs_mut().s = 0x1000;
    cpu.regs_mut().u = 0x2000;
    (cpu, bus)
}

fn ignoring_illegal(cpu: Mc6809) -> Mc6809 {
    cpu.with_config(RunConfig {
        illegal_opcode: IllegalOpcodePolicy::Ignore,
        ..RunConfig::default()
    })
}

// =============================================================================
// Illegal opcodes
// =============================================================================

#[test]
fn illegal_opcode_fails_by_default() {
    let (mut cpu, mut bus) = setup(&[0x01]);
    assert_eq!(
        cpu.step(&mut bus),
        Err(CpuError::IllegalOpcode { opcode: 0x01, address: 0x0100 })
    );
    assert_eq!(cpu.regs().pc, 0x0100);
    assert_eq!(cpu.total_cycles().get(), 0);
}

#[test]
fn illegal_opcode_can_be_skipped() {
    let (cpu, mut bus) = setup(&[0x01, 0x87, 0x12]);
    let mut cpu = ignoring_illegal(cpu);
    assert_eq!(cpu.step(&mut bus), Ok(1));
    assert_eq!(cpu.step(&mut bus), Ok(1));
    assert_eq!(cpu.regs().pc, 0x0102);
    assert_eq!(cpu.step(&mut bus), Ok(2));
}

#[test]
fn unlisted_prefixed_opcode() {
    let (mut cpu, mut bus) = setup(&[0x10, 0x00]);
    assert_eq!(
        cpu.step(&mut bus),
        Err(CpuError::IllegalOpcode { opcode: 0x1000, address: 0x0100 })
    );
    assert_eq!(cpu.regs().pc, 0x0100);

    let mut cpu = ignoring_illegal(cpu);
    assert_eq!(cpu.step(&mut bus), Ok(2));
    assert_eq!(cpu.regs().pc, 0x0102);
}

#[test]
fn illegal_index_postbyte() {
    // LDA [,X+]
    let (mut cpu, mut bus) = setup(&[0xA6, 0x90]);
    assert_eq!(
        cpu.step(&mut bus),
        Err(CpuError::IllegalOpcode { opcode: 0xA6, address: 0x0100 })
    );
    assert_eq!(cpu.regs().pc, 0x0100);
}

// =============================================================================
// EXG / TFR
// =============================================================================

#[test]
fn exchange_of_mixed_widths_is_rejected() {
    // EXG D,A
    let (mut cpu, mut bus) = setup(&[0x1E, 0x08]);
    cpu.regs_mut().set_d(0x1234);
    assert_eq!(
        cpu.step(&mut bus),
        Err(CpuError::InvalidRegisterSelector { postbyte: 0x08, address: 0x0100 })
    );
    assert_eq!(cpu.regs().d(), 0x1234);
    assert_eq!(cpu.regs().pc, 0x0102);
}

#[test]
fn transfer_from_undefined_register_is_rejected() {
    // TFR 6,X
    let (mut cpu, mut bus) = setup(&[0x1F, 0x61]);
    cpu.regs_mut().x = 0x5555;
    assert_eq!(
        cpu.step(&mut bus),
        Err(CpuError::InvalidRegisterSelector { postbyte: 0x61, address: 0x0100 })
    );
    assert_eq!(cpu.regs().x, 0x5555);
}

#[test]
fn transfer_to_pc_jumps() {
    // TFR X,PC
    let (mut cpu, mut bus) = setup(&[0x1F, 0x15]);
    cpu.regs_mut().x = 0x4000;
    assert_eq!(cpu.step(&mut bus), Ok(7));
    assert_eq!(cpu.regs().pc, 0x4000);
}

#[test]
fn transfer_to_cc_replaces_flags() {
    // TFR A,CC
    let (mut cpu, mut bus) = setup(&[0x1F, 0x8A]);
    cpu.regs_mut().a = 0xD5;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs().cc.bits(), 0xD5);
}

// =============================================================================
// Stack
// =============================================================================

#[test]
fn push_and_pull_everything() {
    // PSHS PC,U,Y,X,DP,B,A,CC; PULS CC,A,B,DP,X,Y,U,PC
    let (mut cpu, mut bus) = setup(&[0x34, 0xFF, 0x35, 0xFF]);
    {
        let regs = cpu.regs_mut();
        regs.a = 0x01;
        regs.b = 0x02;
        regs.dp = 0x03;
        regs.x = 0x0405;
        regs.y = 0x0607;
        regs.cc = ConditionCodes(0x0F);
    }
    let before = *cpu.regs();

    assert_eq!(cpu.step(&mut bus), Ok(5 + 12));
    assert_eq!(cpu.regs().s, 0x1000 - 12);
    assert_eq!(bus.peek(0x0FF4), 0x0F);
    assert_eq!(bus.peek(0x0FFF), 0x02);

    {
        let regs = cpu.regs_mut();
        regs.a = 0;
        regs.b = 0;
        regs.dp = 0;
        regs.x = 0;
        regs.y = 0;
        regs.u = 0;
        regs.cc = ConditionCodes(0);
    }
    assert_eq!(cpu.step(&mut bus), Ok(5 + 12));

    // PC comes back as the address after PSHS
    let mut expected = before;
    expected.pc = 0x0102;
    assert_eq!(*cpu.regs(), expected);
}

#[test]
fn user_stack_pushes_s() {
    // PSHU S
    let (mut cpu, mut bus) = setup(&[0x36, 0x40]);
    assert_eq!(cpu.step(&mut bus), Ok(7));
    assert_eq!(cpu.regs().u, 0x1FFE);
    assert_eq!(bus.peek(0x1FFE), 0x10);
    assert_eq!(bus.peek(0x1FFF), 0x00);
}

// =============================================================================
// Memory operands
// =============================================================================

#[test]
fn clear_memory_does_not_need_a_read() {
    // CLR $3000
    let (mut cpu, mut bus) = setup(&[0x7F, 0x30, 0x00]);
    bus.poke(0x3000, 0xAA);
    cpu.regs_mut().cc = ConditionCodes(0x0B);
    assert_eq!(cpu.step(&mut bus), Ok(7));
    assert_eq!(bus.peek(0x3000), 0x00);
    assert_eq!(cpu.regs().cc.bits(), 0x04);
}

#[test]
fn test_memory_writes_nothing() {
    // TST ,X
    let (mut cpu, mut bus) = setup(&[0x6D, 0x84]);
    cpu.regs_mut().x = 0x3000;
    bus.poke(0x3000, 0x80);
    assert_eq!(cpu.step(&mut bus), Ok(6));
    assert_eq!(bus.peek(0x3000), 0x80);
    assert_eq!(cpu.regs().cc.bits(), 0x08);
}

// =============================================================================
// Runs and observation
// =============================================================================

#[test]
fn run_stops_at_step_limit() {
    // BRA *
    let (mut cpu, mut bus) = setup(&[0x20, 0xFE]);
    let summary = cpu.run(&mut bus, 0x0100, Some(0x0102), 10).unwrap();
    assert_eq!(summary.stop, StopReason::StepLimit);
    assert_eq!(summary.steps, 10);
    assert_eq!(summary.cycles, 30);
    assert_eq!(cpu.total_cycles().get(), 30);
}

#[test]
fn run_starting_on_end_does_nothing() {
    let (mut cpu, mut bus) = setup(&[0x12]);
    let summary = cpu.run(&mut bus, 0x0100, Some(0x0100), 10).unwrap();
    assert_eq!(summary.stop, StopReason::ReachedEnd);
    assert_eq!(summary.steps, 0);
}

#[test]
fn run_propagates_errors() {
    let (mut cpu, mut bus) = setup(&[0x12, 0x01]);
    assert_eq!(
        cpu.run(&mut bus, 0x0100, None, 10),
        Err(CpuError::IllegalOpcode { opcode: 0x01, address: 0x0101 })
    );
}

#[test]
fn traced_run_matches_untraced() {
    let program = [0x86, 0x05, 0x4A, 0x26, 0xFD];
    let (mut plain, mut bus) = setup(&program);
    plain.run(&mut bus, 0x0100, Some(0x0105), 100).unwrap();

    let (cpu, mut bus) = setup(&program);
    let mut traced = cpu.with_config(RunConfig {
        trace: true,
        ..RunConfig::default()
    });
    traced.run(&mut bus, 0x0100, Some(0x0105), 100).unwrap();

    assert_eq!(plain.regs(), traced.regs());
    assert_eq!(plain.total_cycles(), traced.total_cycles());
}

#[test]
fn observable_state_follows_execution() {
    // LDD #$8001
    let (mut cpu, mut bus) = setup(&[0xCC, 0x80, 0x01]);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.query("d"), Some(Value::U16(0x8001)));
    assert_eq!(cpu.query("pc"), Some(Value::U16(0x0103)));
    assert_eq!(cpu.query("cc.n"), Some(Value::Bool(true)));
    assert_eq!(cpu.query("cycles"), Some(Value::U64(3)));
}

#[test]
fn saved_state_resumes_identically() {
    let program = [0x86, 0x05, 0x4A, 0x26, 0xFD];
    let (mut cpu, mut bus) = setup(&program);
    cpu.step(&mut bus).unwrap();
    cpu.step(&mut bus).unwrap();
    let saved = cpu.save_state();

    cpu.run(&mut bus, cpu.regs().pc, Some(0x0105), 100).unwrap();
    let finished = *cpu.regs();

    let mut resumed = Mc6809::new();
    resumed.load_state(&saved);
    resumed.run(&mut bus, saved.registers.pc, Some(0x0105), 100).unwrap();
    assert_eq!(*resumed.regs(), finished);
    assert_eq!(resumed.total_cycles(), cpu.total_cycles());
}

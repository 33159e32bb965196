//! Implemented operations for the LC-3.
//!
//! One free function per opcode; the fetch/decode loop in
//! [`crate::emulator::Emulator`] dispatches to them. Loads and stores go
//! through [`Memory::read`]/[`Memory::write`] so the memory mapped keyboard
//! registers are serviced in program order.

use crate::emulator::instruction::Instruction;
use crate::errors::ExecutionError;
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Register, Registers, from_binary};

pub const OP_BR: u8 = 0b0000;
pub const OP_ADD: u8 = 0b0001;
pub const OP_LD: u8 = 0b0010;
pub const OP_ST: u8 = 0b0011;
pub const OP_JSR: u8 = 0b0100;
pub const OP_AND: u8 = 0b0101;
pub const OP_LDR: u8 = 0b0110;
pub const OP_STR: u8 = 0b0111;
pub const OP_RTI: u8 = 0b1000;
pub const OP_NOT: u8 = 0b1001;
pub const OP_LDI: u8 = 0b1010;
pub const OP_STI: u8 = 0b1011;
pub const OP_JMP: u8 = 0b1100;
pub const OP_RESERVED: u8 = 0b1101;
pub const OP_LEA: u8 = 0b1110;
pub const OP_TRAP: u8 = 0b1111;

/// ADD: Mathematical addition in 2 variants
/// - DR is set with result of SR 1 + SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0001 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 + sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0001 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
#[allow(
    clippy::cast_possible_truncation,
    reason = "truncation is what is specified for the LC-3 add opcode"
)]
pub fn add(i: Instruction, r: &mut Registers) {
    r.set(
        i.dr_number(),
        from_binary(
            (r.get(i.sr1_number()).as_binary_u32()
                + (if i.is_immediate() {
                    u32::from(i.get_immediate())
                } else {
                    r.get(i.sr2_number()).as_binary_u32()
                })) as u16,
        ),
    );
    r.update_conditional_register(i.dr_number());
}
/// AND: bit-wise AND in 2 variants
/// - DR is set with result of SR 1 AND SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0101 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 AND sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0101 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn and(i: Instruction, r: &mut Registers) {
    r.set(
        i.dr_number(),
        from_binary(
            r.get(i.sr1_number()).as_binary()
                & (if i.is_immediate() {
                    i.get_immediate()
                } else {
                    r.get(i.sr2_number()).as_binary()
                }),
        ),
    );
    r.update_conditional_register(i.dr_number());
}

/// NOT: bit-wise complement of the value in SR 1
/// ```text
///  15__12__11_9__8_6___5___0_
/// | 1001 |  DR | SR1 | 11111 |
///  --------------------------
/// ```
pub fn not(i: Instruction, r: &mut Registers) {
    r.set(
        i.dr_number(),
        from_binary(!r.get(i.sr1_number()).as_binary()),
    );
    r.update_conditional_register(i.dr_number());
}
/// BR: Conditional Branch
/// Adds the sign extended offset to PC if the current state of the
/// condition register matches a set bit of `n`, `z` or `p`. With all three
/// bits clear the instruction never branches.
/// ```text
///  15__12__11_9___8_______0_
/// | 0000 |  nzp | PCoffset9 |
///  -------------------------
/// ```
/// See [`crate::hardware::registers::ConditionFlag`]
pub fn br(i: Instruction, r: &mut Registers) {
    let nzp = i.get_bit_range(9, 11);
    if nzp & r.get_conditional_register() as u16 != 0 {
        r.set_pc(address_by_offset(r.pc(), i.pc_offset(9)));
    }
}
/// JMP/RET: unconditional jump to the address held by the base register.
/// RET is the special case with R7 as base register.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 1100 | 000 | BaseR | 000000 |
///  ------------------------------
/// ```
pub fn jmp_or_ret(i: Instruction, r: &mut Registers) {
    r.set_pc(r.get(i.base_r_number()).as_binary());
}
/// JSR/JSRR: jump to subroutine.
/// The incremented PC is saved in R7 first, so RET returns to the
/// instruction following the call.
/// - PC-relative variant
/// ```text
///  15__12__11_____10________0_
/// | 0100 |  1  |  PCoffset11 |
///  ---------------------------
/// ```
/// - base-register variant (JSRR)
/// ```text
///  15__12__11_10_9__8___6____5____0_
/// | 0100 | 0 | 00 | BaseR | 000000 |
///  ---------------------------------
/// ```
pub fn jsr(i: Instruction, r: &mut Registers) {
    r.set(7, from_binary(r.pc().as_binary()));
    if i.is_jsr_offset() {
        r.set_pc(address_by_offset(r.pc(), i.pc_offset(11)));
    } else {
        r.set_pc(r.get(i.base_r_number()).as_binary());
    }
}
/// LD: Loads content of memory address of PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 0010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn ld(i: Instruction, r: &mut Registers, memory: &mut Memory) -> Result<(), ExecutionError> {
    let value = memory.read(address_by_offset(r.pc(), i.pc_offset(9)))?;
    r.set(i.dr_number(), from_binary(value));
    r.update_conditional_register(i.dr_number());
    Ok(())
}

/// LDI: Load indirect.
/// Calculates memory address of PC + sign extended offset and reads another address from there,
/// the content of the memory at that indirectly loaded address is put into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn ldi(i: Instruction, r: &mut Registers, memory: &mut Memory) -> Result<(), ExecutionError> {
    let address_address = address_by_offset(r.pc(), i.pc_offset(9));
    let value_address = memory.read(address_address)?;
    let value = memory.read(value_address)?;
    r.set(i.dr_number(), from_binary(value));
    r.update_conditional_register(i.dr_number());
    Ok(())
}
/// LDR: Load address from base register and adds sign extended offset to load the memory content
/// from there into DR.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0110 |  DR | BaseR | offset6 |
///  ------------------------------
/// ```
pub fn ldr(i: Instruction, r: &mut Registers, memory: &mut Memory) -> Result<(), ExecutionError> {
    let value_address = address_by_offset(r.get(i.base_r_number()), i.pc_offset(6));
    let value = memory.read(value_address)?;
    r.set(i.dr_number(), from_binary(value));
    r.update_conditional_register(i.dr_number());
    Ok(())
}

/// LEA: Load Effective Address loads PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1110 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn lea(i: Instruction, r: &mut Registers) {
    r.set(
        i.dr_number(),
        from_binary(address_by_offset(r.pc(), i.pc_offset(9))),
    );
    r.update_conditional_register(i.dr_number());
}
/// ST: Store. The contents of the SR are written to memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 0011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
pub fn st(i: Instruction, r: &Registers, memory: &mut Memory) {
    memory.write(
        address_by_offset(r.pc(), i.pc_offset(9)),
        r.get(i.dr_number()).as_binary(),
    );
}
/// STI: Store Indirect. The contents of the SR are written to the address which is loaded from
/// memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 1011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
pub fn sti(i: Instruction, r: &Registers, memory: &mut Memory) -> Result<(), ExecutionError> {
    let address = memory.read(address_by_offset(r.pc(), i.pc_offset(9)))?;
    memory.write(address, r.get(i.dr_number()).as_binary());
    Ok(())
}
/// STR: Store contents of SR to memory address of base register plus sign extended offset.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0111 |  SR | BaseR | offset6 |
///  ------------------------------
/// ```
pub fn str(i: Instruction, r: &Registers, memory: &mut Memory) {
    memory.write(
        address_by_offset(r.get(i.base_r_number()), i.pc_offset(6)),
        r.get(i.dr_number()).as_binary(),
    );
}

/// Wrapping offset addition in the 16-bit address space.
fn address_by_offset(base: Register, offset: i16) -> u16 {
    base.as_binary().wrapping_add(offset.cast_unsigned())
}

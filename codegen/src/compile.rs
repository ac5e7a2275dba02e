//! Compiles robot programs into a bytecode [`Program`].
//!
//! There is no AST. The sanitizer flattens the source into a statement
//! list, and control-flow nesting is reconstructed by a block stack plus
//! one-statement lookahead at block-close time (to detect an `else if` or
//! `else` continuing the chain). Forward jumps are emitted with placeholder
//! distances and backpatched once their target index is known.
//!
//! # Branch shapes
//!
//! ```text
//! if (cond)             COMPARE, JUMP_IF_FALSE → else/end
//! if ((a) && (b))       COMPARE a, JUMP_IF_FALSE → else/end,
//!                       COMPARE b, JUMP_IF_FALSE → else/end
//! if ((a) || (b))       COMPARE a, JUMP_IF_TRUE → body,
//!                       COMPARE b, JUMP_IF_FALSE → else/end
//! while (true)          WHILE_START ... WHILE_END (backward distance)
//! for (int v=a;v<b;v++) FOR_INIT, FOR_CONDITION, JUMP_IF_FALSE → end,
//!                       ... FOR_INCREMENT, JUMP_BACKWARD → FOR_CONDITION
//! ```
//!
//! An `else if` chain leaves one unconditional `JUMP` at the end of each
//! taken branch; those jumps stay pending until the chain's terminal block
//! closes, then all resolve to the same end point.

use std::mem;

use edubot_bytecode::{CompareOp, Opcode, Operand, Program};
use edubot_problems::Problem;
use log::{debug, trace};

use crate::command::{match_statement, Command, VarType};
use crate::diagnostic::Diagnostic;
use crate::emit::Emitter;
use crate::operand::{resolve, RegisterAllocator, Symbol, SymbolTable};
use crate::sanitize::{sanitize, split_statements};
use crate::validate::validate;

/// Compiles one complete source text into a terminated instruction
/// sequence.
///
/// The call is synchronous and self-contained: it either returns a
/// well-formed program (every jump resolved, exactly one final `End`) or
/// the first fatal [`Diagnostic`].
///
/// ```
/// use edubot_codegen::compile;
///
/// let program = compile("all_leds.set_color(RED);").unwrap();
/// assert_eq!(program.to_words(), vec![10.0, 75.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
/// ```
pub fn compile(source: &str) -> Result<Program, Diagnostic> {
    let sanitized = sanitize(source);
    validate(&sanitized)?;

    let statements = split_statements(&sanitized);
    let mut commands = Vec::with_capacity(statements.len());
    for statement in &statements {
        commands.push(match_statement(statement)?);
    }
    debug!("compiling {} statements", commands.len());

    let mut compiler = Compiler::new();
    for index in 0..commands.len() {
        trace!("statement {}: {:?}", index, commands[index]);
        compiler.step(&commands[index], commands.get(index + 1))?;
    }
    let program = compiler.finish()?;
    debug!("emitted {} instructions", program.len());
    Ok(program)
}

/// Compiles and serializes in one step: little-endian f32 slots, five per
/// instruction, ready for the device transport.
pub fn compile_to_bytes(source: &str) -> Result<Vec<u8>, Diagnostic> {
    compile(source).map(|program| program.to_bytes())
}

/// One open control structure awaiting its closing brace.
#[derive(Debug)]
enum Block {
    For {
        /// The placeholder JumpIfFalse to patch past the loop.
        jump: usize,
        /// The loop counter's register.
        register: u16,
        /// Index of the ForCondition instruction, the backward-jump target.
        condition_start: usize,
    },
    While {
        /// Index of the WhileStart instruction.
        start: usize,
    },
    /// An `if` or `else if`.
    Conditional {
        /// The placeholder JumpIfFalse to patch past this branch.
        jump: usize,
        /// Extra short-circuit jumps sharing the same patch target.
        additional_jumps: Vec<usize>,
        /// End-of-chain jumps inherited from earlier branches.
        pending: Vec<usize>,
    },
    Else {
        /// End-of-chain jumps inherited from earlier branches.
        pending: Vec<usize>,
    },
}

struct Compiler {
    emitter: Emitter,
    symbols: SymbolTable,
    registers: RegisterAllocator,
    blocks: Vec<Block>,
    /// End-of-chain jumps handed from a just-closed branch to the `else if`
    /// or `else` that continues it.
    chain_pending: Vec<usize>,
}

impl Compiler {
    fn new() -> Self {
        Compiler {
            emitter: Emitter::new(),
            symbols: SymbolTable::new(),
            registers: RegisterAllocator::new(),
            blocks: Vec::new(),
            chain_pending: Vec::new(),
        }
    }

    /// Processes one command. `next` is the following command, consulted
    /// only when closing a conditional block.
    fn step(&mut self, command: &Command, next: Option<&Command>) -> Result<(), Diagnostic> {
        match command {
            Command::SetAllLeds(color) => {
                self.emitter.emit_set_all_leds(*color)?;
            }
            Command::MotorDrive {
                direction,
                throttle,
            } => {
                self.emitter.emit_motor_drive(*direction, *throttle)?;
            }
            Command::MotorTurn { direction, degrees } => {
                self.emitter.emit_motor_turn(*direction, *degrees)?;
            }
            Command::MotorSpin {
                direction,
                throttle,
            } => {
                self.emitter.emit_motor_spin(*direction, *throttle)?;
            }
            Command::MotorDriveTime {
                direction,
                throttle,
                seconds,
            } => {
                self.emitter
                    .emit_motor_drive_time(*direction, *throttle, *seconds)?;
            }
            Command::MotorDriveDistance {
                direction,
                throttle,
                centimeters,
            } => {
                self.emitter
                    .emit_motor_drive_distance(*direction, *throttle, *centimeters)?;
            }
            Command::MotorStop => {
                self.emitter.emit_motor_stop()?;
            }
            Command::Wait(seconds) => {
                self.emitter.emit_wait(*seconds)?;
            }
            Command::PlayTone(frequency) => {
                self.emitter.emit_play_tone(*frequency)?;
            }
            Command::PlaySound(id) => {
                self.emitter.emit_play_sound(*id)?;
            }
            Command::WaitForButtonPress => {
                self.emitter.emit_wait_for_button()?;
            }
            Command::Declare {
                var_type,
                name,
                expr,
            } => {
                self.declare(*var_type, name, expr)?;
            }
            Command::Assign { name, expr } => {
                self.assign(name, expr)?;
            }
            Command::If { condition } | Command::ElseIf { condition } => {
                self.open_conditional(condition)?;
            }
            Command::Else => {
                let pending = mem::take(&mut self.chain_pending);
                self.blocks.push(Block::Else { pending });
            }
            Command::WhileTrue => {
                let start = self.emitter.emit_while_start()?;
                self.blocks.push(Block::While { start });
            }
            Command::For { name, from, to } => {
                self.open_for(name, from, to)?;
            }
            Command::BlockOpen => {}
            Command::BlockClose => {
                self.close_block(next)?;
            }
        }
        Ok(())
    }

    fn declare(&mut self, var_type: VarType, name: &str, expr: &str) -> Result<(), Diagnostic> {
        // Resolve first: a sensor read on the right-hand side allocates its
        // own register before the variable gets one.
        let value = self.resolve(expr)?;
        let register = self.registers.allocate()?;
        self.symbols.insert(name, Symbol { var_type, register });
        self.emitter.emit_declare_var(register, value, var_type)?;
        Ok(())
    }

    fn assign(&mut self, name: &str, expr: &str) -> Result<(), Diagnostic> {
        let register = match self.symbols.get(name) {
            Some(symbol) => symbol.register,
            None => {
                return Err(Diagnostic::problem(Problem::UndefinedOperand)
                    .with_context("variable", name));
            }
        };
        let value = self.resolve(expr)?;
        self.emitter.emit_set_var(register, value)?;
        Ok(())
    }

    /// Compiles an `if`/`else if` header and pushes its block. Any pending
    /// end-of-chain jumps from the branch just closed travel into the new
    /// block, so nested chains cannot capture an outer chain's jumps.
    fn open_conditional(&mut self, condition: &str) -> Result<(), Diagnostic> {
        let pending = mem::take(&mut self.chain_pending);
        let (jump, additional_jumps) = self.compile_condition(condition)?;
        self.blocks.push(Block::Conditional {
            jump,
            additional_jumps,
            pending,
        });
        Ok(())
    }

    /// Lowers a branch condition and returns the placeholder jump guarding
    /// the body, plus any extra short-circuit jumps sharing its target.
    fn compile_condition(&mut self, condition: &str) -> Result<(usize, Vec<usize>), Diagnostic> {
        if let Some((left, right)) = condition.split_once("&&") {
            // Short-circuit AND: either side failing skips to else/end.
            self.compile_comparison(strip_outer_parens(left))?;
            let first = self.emitter.emit_forward_jump(Opcode::JumpIfFalse)?;
            self.compile_comparison(strip_outer_parens(right))?;
            let second = self.emitter.emit_forward_jump(Opcode::JumpIfFalse)?;
            return Ok((second, vec![first]));
        }

        if let Some((left, right)) = condition.split_once("||") {
            // Short-circuit OR: the first side passing skips straight into
            // the body, which begins right after the second side's guard.
            self.compile_comparison(strip_outer_parens(left))?;
            let skip = self.emitter.emit_forward_jump(Opcode::JumpIfTrue)?;
            self.compile_comparison(strip_outer_parens(right))?;
            let jump = self.emitter.emit_forward_jump(Opcode::JumpIfFalse)?;
            let body = self.emitter.len();
            self.emitter.patch_forward_jump(skip, body)?;
            return Ok((jump, Vec::new()));
        }

        self.compile_comparison(condition)?;
        let jump = self.emitter.emit_forward_jump(Opcode::JumpIfFalse)?;
        Ok((jump, Vec::new()))
    }

    /// Emits the Compare for one simple condition. A condition with no
    /// comparison operator is a boolean-valued operand, compared for
    /// equality against literal 1.
    fn compile_comparison(&mut self, condition: &str) -> Result<(), Diagnostic> {
        let condition = condition.trim();
        match find_compare_op(condition) {
            Some((at, op_text)) => {
                let op = CompareOp::try_from(op_text).map_err(|_| {
                    Diagnostic::problem(Problem::UnsupportedOperator)
                        .with_context("operator", op_text)
                })?;
                let left = self.resolve(&condition[..at])?;
                let right = self.resolve(&condition[at + op_text.len()..])?;
                self.emitter.emit_compare(op, left, right)?;
            }
            None => {
                let value = self.resolve(condition)?;
                self.emitter
                    .emit_compare(CompareOp::Equal, value, Operand::Immediate(1.0))?;
            }
        }
        Ok(())
    }

    fn open_for(&mut self, name: &str, from: &str, to: &str) -> Result<(), Diagnostic> {
        let from = self.resolve(from)?;
        let register = self.registers.allocate()?;
        self.symbols.insert(
            name,
            Symbol {
                var_type: VarType::Int,
                register,
            },
        );
        self.emitter.emit_for_init(register, from)?;

        let to = self.resolve(to)?;
        let condition_start = self.emitter.emit_for_condition(register, to)?;
        let jump = self.emitter.emit_forward_jump(Opcode::JumpIfFalse)?;
        self.blocks.push(Block::For {
            jump,
            register,
            condition_start,
        });
        Ok(())
    }

    /// Closes the innermost block. For conditionals, `next` decides whether
    /// the chain continues (`else if`/`else`) or ends here.
    fn close_block(&mut self, next: Option<&Command>) -> Result<(), Diagnostic> {
        let block = self.blocks.pop().ok_or_else(|| {
            Diagnostic::problem(Problem::UnmatchedClosingBracket).with_context("found", "}")
        })?;

        match block {
            Block::For {
                jump,
                register,
                condition_start,
            } => {
                let increment = self.emitter.emit_for_increment(register)?;
                self.emitter.emit_jump_backward(increment, condition_start)?;
                let end = self.emitter.len();
                self.emitter.patch_forward_jump(jump, end)?;
            }
            Block::While { start } => {
                self.emitter.emit_while_end(start)?;
            }
            Block::Conditional {
                jump,
                additional_jumps,
                mut pending,
            } => {
                let continues =
                    matches!(next, Some(Command::ElseIf { .. }) | Some(Command::Else));
                if continues {
                    // A taken branch must skip the rest of the chain. The
                    // jump's own target stays pending until the chain ends.
                    let chain_jump = self.emitter.emit_forward_jump(Opcode::Jump)?;
                    let target = self.emitter.len();
                    self.emitter.patch_forward_jump(jump, target)?;
                    for additional in additional_jumps {
                        self.emitter.patch_forward_jump(additional, target)?;
                    }
                    pending.push(chain_jump);
                    self.chain_pending = pending;
                } else {
                    let target = self.emitter.len();
                    self.emitter.patch_forward_jump(jump, target)?;
                    for additional in additional_jumps {
                        self.emitter.patch_forward_jump(additional, target)?;
                    }
                    for chain_jump in pending {
                        self.emitter.patch_forward_jump(chain_jump, target)?;
                    }
                }
            }
            Block::Else { pending } => {
                let target = self.emitter.len();
                for chain_jump in pending {
                    self.emitter.patch_forward_jump(chain_jump, target)?;
                }
            }
        }
        Ok(())
    }

    fn resolve(&mut self, expr: &str) -> Result<Operand, Diagnostic> {
        resolve(expr, &self.symbols, &mut self.registers, &mut self.emitter)
    }

    /// Terminates the program. Any block still open is a syntax error.
    fn finish(self) -> Result<Program, Diagnostic> {
        if !self.blocks.is_empty() {
            return Err(Diagnostic::problem(Problem::UnterminatedBlock));
        }
        self.emitter.finish()
    }
}

/// Finds the first comparison operator in a condition, returning its byte
/// offset and text. Two-character operators are checked first so `<=` is
/// never read as `<`.
fn find_compare_op(condition: &str) -> Option<(usize, &'static str)> {
    const TWO_CHAR: [&str; 4] = ["==", "!=", "<=", ">="];
    const ONE_CHAR: [&str; 2] = ["<", ">"];

    for at in 0..condition.len() {
        if !condition.is_char_boundary(at) {
            continue;
        }
        for op in TWO_CHAR {
            if condition[at..].starts_with(op) {
                return Some((at, op));
            }
        }
        for op in ONE_CHAR {
            if condition[at..].starts_with(op) {
                return Some((at, op));
            }
        }
    }
    None
}

/// Removes one matched pair of surrounding parentheses, if present.
fn strip_outer_parens(text: &str) -> &str {
    let text = text.trim();
    if let Some(inner) = text
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        // Only strip when the outer pair matches itself.
        let mut depth = 0i32;
        for c in inner.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return text;
            }
        }
        return inner.trim();
    }
    text
}

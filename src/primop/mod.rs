use crate::runtime::{
    RuntimeContext,
    errors::{self, MATCH_FAILURE},
    value::Value,
};

/// Primitive operations a compiled program links against.
///
/// IDs are part of the code generator contract, so existing discriminants must
/// remain stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PrimOp {
    /// Integer addition: `Int x Int -> Int`.
    Add = 0,
    /// Integer subtraction: `Int x Int -> Int`.
    Sub = 1,
    /// Integer multiplication: `Int x Int -> Int`.
    Mul = 2,
    /// Truncating integer division: `Int x Int -> Int`.
    Div = 3,
    Eq = 4,
    Neq = 5,
    Less = 6,
    Leq = 7,
    Gre = 8,
    Geq = 9,
    /// Logical and over truthiness.
    And = 10,
    /// Logical or over truthiness.
    Or = 11,
    /// Writes the decimal form of its argument and a newline, returns `0`.
    PrintInt = 12,
    /// Aborts the program with a fixed diagnostic.
    FailMatch = 13,
}

/// Side-effect classification for primitive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimEffect {
    /// Deterministic and side-effect free.
    Pure,
    /// Performs observable I/O.
    Io,
    /// Affects control flow in non-local ways.
    Control,
}

impl PrimOp {
    pub const ALL: [PrimOp; 14] = [
        PrimOp::Add,
        PrimOp::Sub,
        PrimOp::Mul,
        PrimOp::Div,
        PrimOp::Eq,
        PrimOp::Neq,
        PrimOp::Less,
        PrimOp::Leq,
        PrimOp::Gre,
        PrimOp::Geq,
        PrimOp::And,
        PrimOp::Or,
        PrimOp::PrintInt,
        PrimOp::FailMatch,
    ];

    /// Returns the stable ID for this primitive op.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Decodes an ID into a [`PrimOp`].
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Looks up an op by the symbol generated code links against.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Returns the fixed argument count for this operation.
    pub fn arity(self) -> usize {
        match self {
            Self::PrintInt | Self::FailMatch => 1,
            _ => 2,
        }
    }

    /// Human-readable name used in diagnostics and traces.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Less => "less",
            Self::Leq => "leq",
            Self::Gre => "gre",
            Self::Geq => "geq",
            Self::And => "and",
            Self::Or => "or",
            Self::PrintInt => "print_int",
            Self::FailMatch => "fail_match",
        }
    }

    /// Exported C symbol. Division is `divd` so it cannot clash with libc `div`.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Div => "divd",
            other => other.display_name(),
        }
    }

    pub fn effect(self) -> PrimEffect {
        match self {
            Self::PrintInt => PrimEffect::Io,
            Self::FailMatch => PrimEffect::Control,
            _ => PrimEffect::Pure,
        }
    }
}

/// Executes a primitive operation with tagged values.
///
/// Arithmetic wraps on overflow. Integer division by zero is an error rather
/// than a trap.
pub fn execute_primop(
    ctx: &mut dyn RuntimeContext,
    op: PrimOp,
    args: Vec<Value>,
) -> Result<Value, String> {
    if args.len() != op.arity() {
        return Err(errors::arity_error(op.display_name(), op.arity(), args.len()));
    }

    match op {
        PrimOp::Add => int2(args, |a, b| Ok(Value::Integer(a.wrapping_add(b))), op),
        PrimOp::Sub => int2(args, |a, b| Ok(Value::Integer(a.wrapping_sub(b))), op),
        PrimOp::Mul => int2(args, |a, b| Ok(Value::Integer(a.wrapping_mul(b))), op),
        PrimOp::Div => int2(
            args,
            |a, b| {
                if b == 0 {
                    Err("division by zero".to_string())
                } else {
                    Ok(Value::Integer(a.wrapping_div(b)))
                }
            },
            op,
        ),
        PrimOp::Eq => int2(args, |a, b| Ok(Value::Boolean(a == b)), op),
        PrimOp::Neq => int2(args, |a, b| Ok(Value::Boolean(a != b)), op),
        PrimOp::Less => int2(args, |a, b| Ok(Value::Boolean(a < b)), op),
        PrimOp::Leq => int2(args, |a, b| Ok(Value::Boolean(a <= b)), op),
        PrimOp::Gre => int2(args, |a, b| Ok(Value::Boolean(a > b)), op),
        PrimOp::Geq => int2(args, |a, b| Ok(Value::Boolean(a >= b)), op),
        PrimOp::And => logic2(args, |a, b| a && b, op),
        PrimOp::Or => logic2(args, |a, b| a || b, op),
        PrimOp::PrintInt => {
            let value = expect_int(&args[0], op)?;
            ctx.write_stdout(&format_int_line(value))?;
            Ok(Value::Integer(0))
        }
        PrimOp::FailMatch => Err(MATCH_FAILURE.to_string()),
    }
}

/// `print_int` output for one value.
pub fn format_int_line(value: i64) -> String {
    format!("{}\n", value)
}

/// Helper for binary integer primops.
fn int2<F>(args: Vec<Value>, f: F, op: PrimOp) -> Result<Value, String>
where
    F: FnOnce(i64, i64) -> Result<Value, String>,
{
    let left = expect_int(&args[0], op)?;
    let right = expect_int(&args[1], op)?;
    f(left, right)
}

fn logic2<F>(args: Vec<Value>, f: F, op: PrimOp) -> Result<Value, String>
where
    F: FnOnce(bool, bool) -> bool,
{
    let left = expect_condition(&args[0], op)?;
    let right = expect_condition(&args[1], op)?;
    Ok(Value::Boolean(f(left, right)))
}

/// Extracts an integer operand or produces a typed primop error.
fn expect_int(value: &Value, op: PrimOp) -> Result<i64, String> {
    match value {
        Value::Integer(v) => Ok(*v),
        other => Err(errors::type_error(
            op.display_name(),
            "operand",
            "Int",
            other.type_name(),
        )),
    }
}

fn expect_condition(value: &Value, op: PrimOp) -> Result<bool, String> {
    match value {
        Value::Integer(_) | Value::Boolean(_) => Ok(value.is_truthy()),
        other => Err(errors::type_error(
            op.display_name(),
            "operand",
            "Bool or Int",
            other.type_name(),
        )),
    }
}

use std::fmt;
use std::str::FromStr;

/// Error codes for all diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: Parser errors
/// - E2xxx: Evaluation errors
/// - E3xxx: Regex errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Invalid assignment target
    E1005,

    // Evaluation Errors (E2xxx)
    /// Undefined variable
    E2001,
    /// Operand types do not fit a binary operator
    E2002,
    /// Operand type does not fit a unary operator
    E2003,
    /// Wrong number of arguments
    E2004,
    /// Called value is not a function
    E2005,
    /// Index out of bounds
    E2006,
    /// Expected an array
    E2007,
    /// Expected a function
    E2008,
    /// Index is not a non-negative integer
    E2009,
    /// Call depth limit exceeded
    E2010,
    /// `new` on a value that is not a class
    E2011,
    /// Member not found on instance
    E2012,
    /// Member access on a value that is not an instance
    E2013,
    /// Expected a boolean
    E2014,
    /// Expected a string
    E2015,

    // Regex Errors (E3xxx)
    /// Malformed pattern
    E3001,
    /// Pattern too large
    E3002,

    // Internal Errors (E9xxx)
    /// Interpreter invariant violated
    E9001,
}

impl ErrorCode {
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E2014,
        ErrorCode::E2015,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E9001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-paragraph explanation for `mgc explain`.
    pub fn explanation(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "The parser found a token that cannot appear here. The statement is skipped up to the next `;` or closing `}`.",
            ErrorCode::E1002 => "An expression was expected, for example after an operator or `:=`.",
            ErrorCode::E1003 => "The input ended before a `)`, `]` or `}` was closed.",
            ErrorCode::E1004 => "A name was expected, for example after `let`, `def`, `class` or `.`.",
            ErrorCode::E1005 => "Only a variable, a subscript `a[i]` or a member `obj.f` can be assigned to or incremented.",
            ErrorCode::E2001 => "No binding with this name exists in the scope it resolved to. Declare it with `let` first.",
            ErrorCode::E2002 => "The operands do not fit the operator. `+` accepts anything; other arithmetic needs numbers and comparisons need two numbers or two strings.",
            ErrorCode::E2003 => "Unary `-`, `++` and `--` need a number.",
            ErrorCode::E2004 => "A function was called with too many arguments, or without an argument for a parameter that has no default. The body does not run.",
            ErrorCode::E2005 => "Only functions and lambdas can be called.",
            ErrorCode::E2006 => "An index was at or past the end of the array, or `first`/`pop` was applied to an empty array. This stops the rest of the input.",
            ErrorCode::E2007 => "Subscripts and list primitives need an array.",
            ErrorCode::E2008 => "`map`, `filter` and `reduce` take a function as their second argument.",
            ErrorCode::E2009 => "Array indexes must be non-negative whole numbers.",
            ErrorCode::E2010 => "Calls nested deeper than the configured limit, usually from unbounded recursion.",
            ErrorCode::E2011 => "`new` must name a class.",
            ErrorCode::E2012 => "The instance has no member with this name. Members are the bindings its class body defines, plus any assigned later.",
            ErrorCode::E2013 => "Member access with `.` needs a class instance.",
            ErrorCode::E2014 => "`and` and `or` need `true` or `false` on both sides.",
            ErrorCode::E2015 => "`=~` needs a string on both sides: `subject =~ pattern`.",
            ErrorCode::E3001 => "The pattern on the right of `=~` is malformed: an unbalanced group, an unterminated or empty class, a reversed range, a repetition with nothing to repeat, or a trailing backslash.",
            ErrorCode::E3002 => "The pattern is too large: it compiles to more automaton states than the configured limit allows, or nests groups more than 1000 deep.",
            ErrorCode::E9001 => "The interpreter reached a state it should not. Please report the input that caused it.",
        }
    }

    pub fn is_parse_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_eval_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(wanted))
            .ok_or(UnknownErrorCode)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct UnknownErrorCode;

use std::fmt;

/// Error codes for all engine diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Code generation errors
/// - E3xxx: Evaluation errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal or verbatim identifier
    E0001,
    /// Invalid character in source
    E0002,
    /// Number literal rejected by the host number parser
    E0003,
    /// String literal rejected by the host string constructor
    E0004,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,

    // Code Generation Errors (E2xxx)
    /// Unknown identifier
    E2001,
    /// Name bound twice in the same frame
    E2002,
    /// Static function called with the wrong number of arguments
    E2003,
    /// Construct needs a capability the grammar does not provide
    E2004,

    // Evaluation Errors (E3xxx)
    /// Called value is not a function
    E3001,
    /// Function value called with the wrong number of arguments
    E3002,
    /// Map access of a missing field
    E3003,
    /// No method with this name for the receiver
    E3004,
    /// Call depth limit exceeded
    E3005,
    /// Error raised by host code
    E3006,
    /// Value of the wrong kind for a list or map operation
    E3007,

    // Internal Errors (E9xxx)
    /// Host code panicked during evaluation
    E9001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            // Parser
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            // Code generation
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            // Evaluation
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            // Internal
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line summary of the failure class.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated quote",
            ErrorCode::E0002 => "invalid character",
            ErrorCode::E0003 => "malformed number",
            ErrorCode::E0004 => "malformed string",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E2001 => "unknown identifier",
            ErrorCode::E2002 => "duplicate name",
            ErrorCode::E2003 | ErrorCode::E3002 => "wrong number of arguments",
            ErrorCode::E2004 => "unsupported construct",
            ErrorCode::E3001 => "value is not callable",
            ErrorCode::E3003 => "undefined field",
            ErrorCode::E3004 => "no such method",
            ErrorCode::E3005 => "call depth exceeded",
            ErrorCode::E3006 => "host error",
            ErrorCode::E3007 => "wrong value type",
            ErrorCode::E9001 => "host code panicked",
        }
    }

    /// Whether this error is raised before evaluation starts.
    pub fn is_compile_time(&self) -> bool {
        !self.is_runtime()
    }

    /// Whether this error is raised while running compiled code.
    pub fn is_runtime(&self) -> bool {
        self.as_str().starts_with("E3") || *self == ErrorCode::E9001
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests;

//! The `explain` command: describe an error code.

use mgc_diagnostic::ErrorCode;

/// Print the explanation for `code_str`, e.g. `E2004`.
pub fn explain_error(code_str: &str) -> bool {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E1001, E2004, E3001");
        return false;
    };
    println!("{code}: {}", code.explanation());
    true
}

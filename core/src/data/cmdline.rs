//! Windows command-line splitting, following the rules the MSVC runtime and
//! `CommandLineToArgvW` apply to a process's command line.
//!
//! - Spaces and tabs outside quotes separate arguments.
//! - `"` toggles quoting. Inside quotes, `""` is a literal quote.
//! - `2n` backslashes before a quote become `n` backslashes and the quote
//!   toggles; `2n+1` become `n` backslashes and a literal quote.
//! - Backslashes not followed by a quote are literal, so `C:\src` survives.


/// Split `line` into arguments. Returns `None` when a quoted section is left
/// open.
pub fn split(line: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' if !quoted => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            '\\' => {
                in_arg = true;
                let mut backslashes = 1;
                while chars.peek() == Some(&'\\') {
                    chars.next();
                    backslashes += 1;
                }
                if chars.peek() == Some(&'"') {
                    current.extend(std::iter::repeat('\\').take(backslashes / 2));
                    if backslashes % 2 == 1 {
                        chars.next();
                        current.push('"');
                    }
                } else {
                    current.extend(std::iter::repeat('\\').take(backslashes));
                }
            }
            '"' => {
                in_arg = true;
                if quoted && chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    quoted = !quoted;
                }
            }
            other => {
                in_arg = true;
                current.push(other);
            }
        }
    }

    if quoted {
        return None;
    }
    if in_arg {
        args.push(current);
    }
    Some(args)
}

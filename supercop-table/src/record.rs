//! Parsing of SUPERCOP `data` log lines.
//!
//! A measurement line is a sequence of whitespace separated tokens:
//!
//! ```text
//! <version> <host> <abi> <date> <primitive> <timecop> [(<annotation>)]
//!     <checksum> ok <cycles> <checksum-cycles> <cycles-per-second>
//!     <implementation> <compiler>_<flags>
//! ```
//!
//! Identifiers are runs of ASCII word characters which may also contain `/`;
//! the implementation may additionally contain `-`. The three counts are runs
//! of ASCII digits. Anything that does not fit this shape is not a
//! measurement and is reported as `None`.

/// The tag carried by object-size diagnostic lines, which are never measurements.
const OBJSIZE_TAG: &str = "objsize";

/// The only status whose cycle counts are usable.
const STATUS_OK: &str = "ok";

/// One measurement line, borrowing from the text it was parsed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record<'a> {
    pub version: &'a str,
    pub host: &'a str,
    pub abi: &'a str,
    pub date: &'a str,
    pub primitive: &'a str,
    pub timecop: &'a str,
    /// The parenthesized annotation, without its parentheses
    pub annotation: Option<&'a str>,
    pub checksum: &'a str,
    pub cycles: u64,
    pub checksum_cycles: u64,
    pub cycles_per_second: u64,
    pub implementation: &'a str,
    pub compiler: &'a str,
    pub flags: &'a str,
}

/// Returns whether `line` is an object-size diagnostic line.
pub fn is_objsize(line: &str) -> bool {
    line.split_whitespace()
        .any(|token| token == OBJSIZE_TAG)
}

/// Parses one log line.
///
/// Returns `None` for object-size lines, lines with a status other than `ok`,
/// and every line that does not follow the measurement grammar.
pub fn parse_line(line: &str) -> Option<Record<'_>> {
    if is_objsize(line) {
        return None;
    }

    let tokens = line.split_whitespace().collect::<Vec<&str>>();
    let (head, rest) = tokens.split_at_checked(6)?;
    let (annotation, tail) = split_annotation(line, rest)?;

    match (head, tail) {
        (
            &[version, host, abi, date, primitive, timecop],
            &[
                checksum,
                STATUS_OK,
                cycles,
                checksum_cycles,
                cycles_per_second,
                implementation,
                compiler_flags,
            ],
        ) => {
            let identifiers = [version, host, abi, date, primitive, timecop, checksum];
            if !identifiers
                .iter()
                .all(|token| is_identifier(token))
                || !is_implementation(implementation)
            {
                return None;
            }

            let (compiler, flags) = split_compiler(compiler_flags)?;

            Some(Record {
                version,
                host,
                abi,
                date,
                primitive,
                timecop,
                annotation,
                checksum,
                cycles: parse_count(cycles)?,
                checksum_cycles: parse_count(checksum_cycles)?,
                cycles_per_second: parse_count(cycles_per_second)?,
                implementation,
                compiler,
                flags,
            })
        }
        _ => None,
    }
}

/// Splits an optional leading `(...)` annotation off `tokens`.
///
/// The annotation may span several tokens; its text is returned as it appears
/// in `line`, without the enclosing parentheses.
fn split_annotation<'a, 'b>(
    line: &'a str,
    tokens: &'b [&'a str],
) -> Option<(Option<&'a str>, &'b [&'a str])> {
    let Some(first) = tokens.first() else {
        return Some((None, tokens));
    };
    if !first.starts_with('(') {
        return Some((None, tokens));
    }

    let last = tokens
        .iter()
        .position(|token| token.ends_with(')'))?;

    // tokens are subslices of `line`, so their offsets delimit the annotation
    let start = first.as_ptr() as usize - line.as_ptr() as usize;
    let closing = tokens[last];
    let end = closing.as_ptr() as usize - line.as_ptr() as usize + closing.len();
    let inner = &line[start + 1..end - 1];
    if inner.contains(['(', ')']) {
        return None;
    }

    Some((Some(inner), &tokens[last + 1..]))
}

fn split_compiler(token: &str) -> Option<(&str, &str)> {
    let (compiler, flags) = token.split_once('_')?;
    if compiler.is_empty() || flags.is_empty() || !compiler.bytes().all(is_word_byte) {
        return None;
    }
    Some((compiler, flags))
}

fn parse_count(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn is_identifier(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| is_word_byte(b) || b == b'/')
}

fn is_implementation(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| is_word_byte(b) || b == b'/' || b == b'-')
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

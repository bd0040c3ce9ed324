//! Naming and path helpers for emitted files.

/// File stem for a type: a separator is inserted before an uppercase run
/// that follows a lowercase letter, then the whole name is lowercased.
/// `PersonDTO` becomes `person-dto`, `APIClient` stays `apiclient`.
pub fn kebab_file_stem(simple_name: &str) -> String {
    let mut out = String::with_capacity(simple_name.len() + 4);
    let mut prev_lower = false;
    for ch in simple_name.chars() {
        if ch.is_uppercase() && prev_lower {
            out.push('-');
        }
        prev_lower = ch.is_lowercase();
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    out
}

/// Package path: dots become path separators.
pub fn package_path(package: &str) -> String {
    package.replace('.', "/")
}

/// Relative module specifier from one generated file's directory to another
/// generated file, extension-less, with an explicit `./` for siblings.
pub fn relative_specifier(from_dir: &str, to_dir: &str, to_stem: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = to_dir.split('/').filter(|s| !s.is_empty()).collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = String::new();
    for _ in common..from.len() {
        out.push_str("../");
    }
    if out.is_empty() {
        out.push_str("./");
    }
    for segment in &to[common..] {
        out.push_str(segment);
        out.push('/');
    }
    out.push_str(to_stem);
    out
}

/// Quote a property key unless it is already a valid identifier.
pub fn quote_if_needed(name: &str) -> String {
    if is_valid_identifier(name) {
        name.to_string()
    } else {
        format!("'{}'", escape_single_quoted(name))
    }
}

/// Escape a string for a single-quoted TypeScript literal.
pub fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

use indexmap::IndexMap;

/// Allocates fresh local names derived from type names, deduplicating with
/// numeric suffixes: `Log` becomes `log`, a second `Log` becomes `log1`.
#[derive(Debug, Default)]
pub struct NameTable {
    used: IndexMap<String, usize>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self, raw: &str) -> String {
        let base = sanitize(raw);
        let count = self.used.entry(base.clone()).or_insert(0);
        let name = if *count == 0 {
            base
        } else {
            format!("{base}{count}")
        };
        *count += 1;
        name
    }
}

/// The trailing identifier of a type name, lower-cased: `Web` → `web`,
/// `[]*Log` → `log`. Falls back to `v` for names with no identifier tail.
fn sanitize(raw: &str) -> String {
    let tail: String = raw
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if tail.is_empty() {
        "v".to_owned()
    } else {
        tail.to_ascii_lowercase()
    }
}

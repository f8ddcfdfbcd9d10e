use crate::store::OverrideStore;
use crate::Value;
use std::collections::HashMap;
use std::fmt::Write;

/// One bool flag as listed by the [`crate::Inspector`].
#[derive(Clone, Debug, PartialEq)]
pub struct FlagRow {
    /// Key of the flag.
    pub key: String,
    /// The effective value, with overrides applied.
    pub enabled: bool,
    /// Whether the value is forced by an override.
    pub forced: bool,
}

impl FlagRow {
    /// `On` or `Off`, followed by `, Forced` when the value is overridden.
    pub fn status(&self) -> String {
        let mut status = String::from(if self.enabled { "On" } else { "Off" });
        if self.forced {
            status.push_str(", Forced");
        }
        status
    }
}

pub(crate) fn build_rows(
    merged: &HashMap<String, Value>,
    store: &OverrideStore,
    filter: &str,
) -> Vec<FlagRow> {
    let mut rows = merged
        .iter()
        .filter(|(key, _)| key.contains(filter))
        .filter_map(|(key, value)| {
            value.as_bool().map(|enabled| FlagRow {
                key: key.clone(),
                enabled,
                forced: store.is_overridden(key),
            })
        })
        .collect::<Vec<FlagRow>>();
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

pub(crate) fn render(rows: &[FlagRow], filter: &str) -> String {
    let mut out = String::new();
    _ = writeln!(out, "Feature flags  filter: \"{filter}\"  [reset all]");
    if rows.is_empty() {
        out.push_str("  (no matching flags)\n");
        return out;
    }
    let width = rows.iter().map(|r| r.key.chars().count()).max().unwrap_or(0);
    for row in rows {
        let check = if row.enabled { "[x]" } else { "[ ]" };
        let reset = if row.forced { "  [reset]" } else { "" };
        _ = writeln!(out, "{check} {:<width$}  {}{reset}", row.key, row.status());
    }
    out
}

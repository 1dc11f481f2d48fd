use std::collections::BTreeSet;

use crate::binding::descriptor::FieldBindingDescriptor;

/// Whether `name` is spelled as a short option: exactly one character, not a separator.
pub fn is_shortcut(name: &str) -> bool {
    let mut chars = name.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c != '_' && c != '-')
}

// Short options, then canonical (hyphenated) longs, then the remaining longs.
fn rank(option: &str) -> u8 {
    if option.chars().count() <= 2 {
        0
    } else if option.starts_with("--") && !option.contains('_') {
        1
    } else if option.starts_with("--") {
        2
    } else {
        3
    }
}

/// The command line spellings of a field, shortest and most canonical first.
///
/// Switches are spelled `--with-<name>` (default off) or `--without-<name>` (default on),
/// in both hyphenated and underscored forms. Other fields get `-<c>` for single character
/// names and `--<name>` in both forms otherwise.
pub fn options(descriptor: &FieldBindingDescriptor) -> Vec<String> {
    let names = std::iter::once(descriptor.name()).chain(descriptor.aliases().iter().map(String::as_str));
    let mut spellings = BTreeSet::new();

    for name in names {
        if descriptor.is_switch() {
            let prefix = if descriptor.switch_default() {
                "without"
            } else {
                "with"
            };
            spellings.insert(format!("--{prefix}-{}", name.replace('_', "-")));
            spellings.insert(format!("--{prefix}_{}", name.replace('-', "_")));
        } else if is_shortcut(name) {
            spellings.insert(format!("-{name}"));
        } else {
            spellings.insert(format!("--{}", name.replace('-', "_")));
            spellings.insert(format!("--{}", name.replace('_', "-")));
        }
    }

    let mut ordered: Vec<String> = spellings.into_iter().collect();
    ordered.sort_by_key(|option| rank(option));
    ordered
}

//! Class label set of the ASL alphabet classifier.
//!

/// Output classes in the exact index order the classifier was trained
/// against. Do not reorder: row `i` of the model output scores class `i`.
pub const CLASS_LABELS: [&str; 29] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "del", "nothing", "space",
];

/// Number of output classes.
pub const NUM_CLASSES: usize = CLASS_LABELS.len();

/// Label at `index`, or `None` if out of range.
pub fn label_of(index: usize) -> Option<&'static str> {
    CLASS_LABELS.get(index).copied()
}

/// Index of `label` in the class set, or `None` if unknown.
pub fn index_of(label: &str) -> Option<usize> {
    CLASS_LABELS.iter().position(|&known| known == label)
}

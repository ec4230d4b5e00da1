//! Default material label definitions.

/// Material labels in index order with their display colour (RGB).
pub const MATERIALS: [(&str, [u8; 3]); 14] = [
    ("Unclassified", [0, 0, 0]),
    ("Asphalt", [128, 128, 128]),
    ("Concrete", [232, 232, 232]),
    ("Glass", [255, 0, 255]),
    ("Tree", [38, 154, 38]),
    ("Vegetation", [0, 255, 0]),
    ("Metal", [0, 255, 255]),
    ("Ceramic", [255, 0, 0]),
    ("Soil", [255, 255, 0]),
    ("Solar_panel", [96, 0, 191]),
    ("Water", [0, 0, 255]),
    ("Polymer", [255, 255, 255]),
    ("Unscored", [0, 0, 0]),
    ("Indeterminate", [0, 0, 0]),
];

/// One entry of the material map.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialEntry {
    pub index: i64,
    pub name: &'static str,
    /// Colour scaled to `[0, 1]`.
    pub color: [f32; 3],
}

/// Material index, name and normalized colour for every default label.
#[must_use]
pub fn material_map() -> Vec<MaterialEntry> {
    MATERIALS
        .iter()
        .zip(0_i64..)
        .map(|(&(name, rgb), index)| MaterialEntry {
            index,
            name,
            color: rgb.map(|c| f32::from(c) / 255.0),
        })
        .collect()
}

/// Names of the default material labels.
#[must_use]
pub fn default_material_names() -> Vec<String> {
    MATERIALS.iter().map(|(name, _)| (*name).to_string()).collect()
}

/// Names of `labels` in `names`; labels without a name are skipped.
pub fn label_names<'a>(names: &'a [String], labels: impl IntoIterator<Item = i64>) -> Vec<&'a str> {
    labels
        .into_iter()
        .filter_map(|label| usize::try_from(label).ok())
        .filter_map(|index| names.get(index))
        .map(String::as_str)
        .collect()
}

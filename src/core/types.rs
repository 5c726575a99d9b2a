/// Dense 32-bit identifier assigned to each distinct value.
pub type Code = u32;

/// Prefix search output: one entry per matching dictionary value,
/// paired with the ascending row indices where it occurs.
pub type PrefixMatches = Vec<(String, Vec<usize>)>;

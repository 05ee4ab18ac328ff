//! Glyphs used when rendering a tree as text

pub mod icons {
    pub const EXPAND: &str = "▼";
    pub const COLLAPSE: &str = "▶";
    pub const LEAF: &str = "·";
    pub const LOAD_MORE: &str = "…";
}

pub mod icons_ascii {
    pub const EXPAND: &str = "[v]";
    pub const COLLAPSE: &str = "[>]";
    pub const LEAF: &str = "-";
    pub const LOAD_MORE: &str = "...";
}

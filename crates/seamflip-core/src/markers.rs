//! Line vocabulary recognised in slicer output
//!
//! All comparisons are case-sensitive prefix (or exact) matches on the raw line.

/// Leading character of a comment line
pub const COMMENT: char = ';';

/// Emitted by the slicer before each object's toolpaths
pub const OBJECT_START: &str = "; printing object";
/// Emitted by the slicer after each object's toolpaths
pub const OBJECT_END: &str = "; stop printing object";

/// Extrusion role comment
pub const TYPE_TAG: &str = ";TYPE:";
/// Extrusion width comment
pub const WIDTH_TAG: &str = ";WIDTH:";
/// Layer height comment
pub const HEIGHT_TAG: &str = ";HEIGHT:";

/// Role value that opens a perimeter block
pub const PERIMETER: &str = "Perimeter";
/// Role value that continues a perimeter block as overhang
pub const OVERHANG_PERIMETER: &str = "Overhang perimeter";

/// Set print/travel acceleration
pub const ACCELERATION_PREFIX: &str = "M204 S";
/// Set part cooling fan speed
pub const FAN_PREFIX: &str = "M106 S";

/// A line that bounds an object or a perimeter block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMarker {
    /// `; printing object ...`
    ObjectStart,
    /// `; stop printing object ...`
    ObjectEnd,
    /// `;TYPE:Perimeter`
    PerimeterStart,
    /// `;TYPE:Overhang perimeter`
    OverhangPerimeter,
    /// `;TYPE:` with any other role
    RoleChange,
}

impl BlockMarker {
    /// Classify `line`, returning `None` for lines that bound nothing
    pub fn classify(line: &str) -> Option<Self> {
        if line.starts_with(OBJECT_START) {
            return Some(Self::ObjectStart);
        }
        if line.starts_with(OBJECT_END) {
            return Some(Self::ObjectEnd);
        }
        let role = line.strip_prefix(TYPE_TAG)?;
        Some(match role {
            PERIMETER => Self::PerimeterStart,
            OVERHANG_PERIMETER => Self::OverhangPerimeter,
            _ => Self::RoleChange,
        })
    }

    /// Whether this marker closes an open perimeter block
    pub fn closes_perimeter_block(self) -> bool {
        matches!(self, Self::ObjectEnd | Self::RoleChange)
    }
}

/// Role comment for a perimeter of the given kind
pub fn perimeter_type_comment(overhang: bool) -> String {
    let role = if overhang { OVERHANG_PERIMETER } else { PERIMETER };
    format!("{TYPE_TAG}{role}")
}

//! Connector visual types.
//!
//! A connector is the diagram presentation of a model relationship. This
//! module describes how it should look: line style and the markers drawn at
//! each end. Rendering is left to the consumer.

use std::{fmt, str};

use crate::stereotype::RelationshipStereotype;

/// Defines the stroke pattern of a connector line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

impl str::FromStr for LineStyle {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            _ => Err("Invalid line style"),
        }
    }
}

/// Defines the marker drawn at one end of a connector.
///
/// - `None`: Plain line end
/// - `OpenArrow`: `->` style open arrowhead
/// - `HollowTriangle`: UML generalization/realization head
/// - `Diamond`: UML composition marker
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowHead {
    #[default]
    None,
    OpenArrow,
    HollowTriangle,
    Diamond,
}

impl fmt::Display for ArrowHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::OpenArrow => write!(f, "open-arrow"),
            Self::HollowTriangle => write!(f, "hollow-triangle"),
            Self::Diamond => write!(f, "diamond"),
        }
    }
}

/// The visual type of a connector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorType {
    line: LineStyle,
    source_head: ArrowHead,
    target_head: ArrowHead,
}

impl ConnectorType {
    pub fn new(line: LineStyle, source_head: ArrowHead, target_head: ArrowHead) -> Self {
        Self {
            line,
            source_head,
            target_head,
        }
    }

    /// Returns the conventional UML look for a relationship stereotype.
    ///
    /// # Examples
    ///
    /// ```
    /// use codeweave_core::{
    ///     connector::{ArrowHead, ConnectorType, LineStyle},
    ///     stereotype::RelationshipStereotype,
    /// };
    ///
    /// let realization = ConnectorType::for_stereotype(RelationshipStereotype::Implementation);
    /// assert_eq!(realization.line(), LineStyle::Dashed);
    /// assert_eq!(realization.target_head(), ArrowHead::HollowTriangle);
    /// ```
    pub fn for_stereotype(stereotype: RelationshipStereotype) -> Self {
        match stereotype {
            RelationshipStereotype::Inheritance => {
                Self::new(LineStyle::Solid, ArrowHead::None, ArrowHead::HollowTriangle)
            }
            RelationshipStereotype::Implementation => {
                Self::new(LineStyle::Dashed, ArrowHead::None, ArrowHead::HollowTriangle)
            }
            RelationshipStereotype::Association => {
                Self::new(LineStyle::Solid, ArrowHead::None, ArrowHead::OpenArrow)
            }
            RelationshipStereotype::Containment => {
                Self::new(LineStyle::Solid, ArrowHead::Diamond, ArrowHead::None)
            }
        }
    }

    pub fn line(&self) -> LineStyle {
        self.line
    }

    pub fn source_head(&self) -> ArrowHead {
        self.source_head
    }

    pub fn target_head(&self) -> ArrowHead {
        self.target_head
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = match self.line {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
        };
        write!(f, "{} {}..{}", line, self.source_head, self.target_head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_style_from_str() {
        assert_eq!("solid".parse::<LineStyle>(), Ok(LineStyle::Solid));
        assert_eq!("dashed".parse::<LineStyle>(), Ok(LineStyle::Dashed));
        assert!("dotted".parse::<LineStyle>().is_err());
    }

    #[test]
    fn test_containment_marks_source() {
        let connector = ConnectorType::for_stereotype(RelationshipStereotype::Containment);
        assert_eq!(connector.source_head(), ArrowHead::Diamond);
        assert_eq!(connector.target_head(), ArrowHead::None);
    }

    #[test]
    fn test_display() {
        let connector = ConnectorType::for_stereotype(RelationshipStereotype::Inheritance);
        assert_eq!(connector.to_string(), "solid none..hollow-triangle");
    }
}

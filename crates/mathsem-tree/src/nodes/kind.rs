// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The closed set of presentation element kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a tag name does not name a known element kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown element kind '{0}'")]
pub struct UnknownKind(pub String);

/// Macro to generate the [`Kind`] enumeration together with its tag table.
///
/// Each entry maps a variant to the element tag it is read from and written
/// as, so the enum, `tag()`, `FromStr` and serde names never drift apart.
macro_rules! node_kinds {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $tag:literal
        ),* $(,)?
    ) => {
        /// Kind of a presentation tree node (one per element tag).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Kind {
            $(
                $(#[$meta])*
                #[serde(rename = $tag)]
                $variant,
            )*
        }

        impl Kind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [Kind] = &[$(Kind::$variant),*];

            /// The element tag for this kind (e.g. `"mfrac"`).
            pub fn tag(self) -> &'static str {
                match self {
                    $(Kind::$variant => $tag,)*
                }
            }
        }

        impl FromStr for Kind {
            type Err = UnknownKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok(Kind::$variant),)*
                    _ => Err(UnknownKind(s.to_string())),
                }
            }
        }
    };
}

node_kinds! {
    /// Top-level `math` element.
    Math => "math",
    /// Identifier token.
    Mi => "mi",
    /// Number token.
    Mn => "mn",
    /// Operator token.
    Mo => "mo",
    /// Text token.
    Mtext => "mtext",
    Mspace => "mspace",
    /// String literal token.
    Ms => "ms",
    Mrow => "mrow",
    Mfrac => "mfrac",
    Msqrt => "msqrt",
    /// Indexed root: children are `[radicand, index]`.
    Mroot => "mroot",
    Mstyle => "mstyle",
    Merror => "merror",
    Mpadded => "mpadded",
    Mphantom => "mphantom",
    Mfenced => "mfenced",
    Menclose => "menclose",
    Msub => "msub",
    Msup => "msup",
    Msubsup => "msubsup",
    Munder => "munder",
    Mover => "mover",
    Munderover => "munderover",
    Mmultiscripts => "mmultiscripts",
    Mprescripts => "mprescripts",
    Mtable => "mtable",
    Mlabeledtr => "mlabeledtr",
    Mtr => "mtr",
    Mtd => "mtd",
    Maligngroup => "maligngroup",
    Malignmark => "malignmark",
    Mstack => "mstack",
    Mlongdiv => "mlongdiv",
    Msgroup => "msgroup",
    Msrow => "msrow",
    Mscarries => "mscarries",
    Mscarry => "mscarry",
    Msline => "msline",
    /// Conditional rendering; only the second child is ever shown.
    Maction => "maction",
    Semantics => "semantics",
    Annotation => "annotation",
    AnnotationXml => "annotation-xml",
    /// Explicit empty placeholder.
    None => "none",
    /// Placeholder produced by upstream tree construction.
    Dummy => "dummy",
}

impl Kind {
    /// Returns true for token elements that carry a text payload.
    pub fn is_token(self) -> bool {
        matches!(
            self,
            Kind::Mi | Kind::Mn | Kind::Mo | Kind::Mtext | Kind::Mspace | Kind::Ms
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

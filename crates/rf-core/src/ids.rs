//! Strongly typed identifier wrappers.
//!
//! SUMO identifies edges, lanes and junctions by arbitrary strings, so the
//! wrappers hold a `String` rather than an index.  All IDs are
//! `Ord + Hash` so they can be used as map keys and in sorted collections.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// A directed road segment of the network (`<edge id="...">`).
    pub struct EdgeId;
}

string_id! {
    /// A lane of an edge (`<lane id="...">`, conventionally `<edge>_<index>`).
    pub struct LaneId;
}

string_id! {
    /// A network node (`<junction id="...">`).
    pub struct JunctionId;
}

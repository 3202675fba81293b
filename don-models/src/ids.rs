// Copyright (c) 2022 MASSA LABS <info@massa.net>

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Borrow the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// An identifier is only meaningful once the remote side filled it
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name(value)
            }
        }
    };
}

string_id!(
    /// Identifier issued by the registrar when a node registers.
    NodeId
);
string_id!(
    /// Identifier issued by a node when it creates its registrar link.
    LinkId
);
string_id!(
    /// Identifier of a chain configuration record.
    ChainConfigId
);
string_id!(
    /// Identifier of a job proposal on a node.
    ProposalId
);

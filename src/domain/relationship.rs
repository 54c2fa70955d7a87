use std::fmt;

/// How widely a relationship kind searches around a code.
///
/// Close relatives sit on the code's own branch of the hierarchy; distant
/// relatives only share a coarse prefix. The resolver exhausts the close
/// tier before consulting the distant one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Children, siblings, and parents.
    Close,
    /// Half-siblings, cousins, and extended family.
    Distant,
}

impl Tier {
    /// The tier's display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Close => "Close",
            Self::Distant => "Distant",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural relationship between a queried code and entries of the
/// reference table, defined purely by string-prefix rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Relationship {
    /// Entries extending the queried code by 1–4 characters; only the
    /// closest non-empty generation counts.
    Children,
    /// Entries of the same length differing only in the final character.
    Siblings,
    /// The longest proper prefix of the queried code present in the table.
    Parents,
    /// Same-length entries sharing all but the last two characters, with
    /// numeric suffixes within a distance of 10.
    HalfSiblings,
    /// Entries sharing the queried code's first three characters.
    Cousins,
    /// Entries sharing the queried code's first two characters.
    ExtendedFamily,
}

impl Relationship {
    /// The close-tier kinds, in the order the resolver evaluates them.
    pub const CLOSE: [Self; 3] = [Self::Children, Self::Siblings, Self::Parents];

    /// The distant-tier kinds, in the order the resolver evaluates them.
    pub const DISTANT: [Self; 3] = [Self::HalfSiblings, Self::Cousins, Self::ExtendedFamily];

    /// The tier this kind belongs to.
    #[must_use]
    pub const fn tier(self) -> Tier {
        match self {
            Self::Children | Self::Siblings | Self::Parents => Tier::Close,
            Self::HalfSiblings | Self::Cousins | Self::ExtendedFamily => Tier::Distant,
        }
    }

    /// The kind's display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Children => "Children",
            Self::Siblings => "Siblings",
            Self::Parents => "Parents",
            Self::HalfSiblings => "Half-Siblings",
            Self::Cousins => "Cousins",
            Self::ExtendedFamily => "Extended Family",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(Relationship::Children, Tier::Close)]
    #[test_case(Relationship::Siblings, Tier::Close)]
    #[test_case(Relationship::Parents, Tier::Close)]
    #[test_case(Relationship::HalfSiblings, Tier::Distant)]
    #[test_case(Relationship::Cousins, Tier::Distant)]
    #[test_case(Relationship::ExtendedFamily, Tier::Distant)]
    fn tiers(kind: Relationship, tier: Tier) {
        assert_eq!(kind.tier(), tier);
    }

    #[test]
    fn display_names() {
        assert_eq!(Relationship::HalfSiblings.to_string(), "Half-Siblings");
        assert_eq!(Relationship::ExtendedFamily.to_string(), "Extended Family");
        assert_eq!(Tier::Distant.to_string(), "Distant");
    }
}

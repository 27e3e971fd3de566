//! The [`Cell`] type — passability plus an endpoint [`Role`].

/// Endpoint role a cell may carry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    #[default]
    None,
    Start,
    End,
}

/// One board cell.
///
/// A cell holding the `Start` or `End` role is always passable; [`Grid`]
/// enforces that on every mutation.
///
/// [`Grid`]: crate::Grid
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub passable: bool,
    pub role: Role,
}

impl Cell {
    /// A passable cell with no role.
    pub const EMPTY: Self = Self {
        passable: true,
        role: Role::None,
    };

    /// An obstacle.
    pub const OBSTACLE: Self = Self {
        passable: false,
        role: Role::None,
    };

    /// Set the role (builder).
    #[inline]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Passable and without a role.
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    #[inline]
    pub fn is_obstacle(self) -> bool {
        !self.passable
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

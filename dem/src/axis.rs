use crate::{DemError, C};

/// Uniformly spaced grid posts along one geographic axis.
///
/// Spacing is signed: rasters stored north-up have a negative latitude
/// spacing, so coordinates _decrease_ with the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    /// Coordinate of post 0, in degrees.
    origin: C,

    /// Signed change in degrees from one post to the next.
    spacing: C,

    /// Number of posts.
    len: usize,
}

impl Axis {
    /// Returns a new axis. `name` is only used for error reporting.
    pub fn new(name: &'static str, origin: C, spacing: C, len: usize) -> Result<Self, DemError> {
        if len == 0 {
            return Err(DemError::Empty);
        }
        if !origin.is_finite() {
            return Err(DemError::Origin { axis: name, origin });
        }
        if !spacing.is_finite() || (len > 1 && spacing == 0.0) {
            return Err(DemError::Spacing {
                axis: name,
                spacing,
                len,
            });
        }
        Ok(Self {
            origin,
            spacing,
            len,
        })
    }

    pub fn origin(&self) -> C {
        self.origin
    }

    pub fn spacing(&self) -> C {
        self.spacing
    }

    /// Returns the number of posts on this axis.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the coordinate of post `index`.
    #[allow(clippy::cast_precision_loss)]
    pub fn coordinate(&self, index: usize) -> C {
        self.origin + index as C * self.spacing
    }

    /// Returns the `(min, max)` coordinates covered by this axis.
    ///
    /// Coverage runs from the origin to `origin + spacing * len`,
    /// i.e. one full cell past the last post.
    #[allow(clippy::cast_precision_loss)]
    pub fn extent(&self) -> (C, C) {
        let end = self.origin + self.len as C * self.spacing;
        if self.spacing < 0.0 {
            (end, self.origin)
        } else {
            (self.origin, end)
        }
    }

    /// Returns true if `value` lies within [Axis::extent], inclusive.
    pub fn contains(&self, value: C) -> bool {
        let (min, max) = self.extent();
        min <= value && value <= max
    }

    /// Returns the indices of the two posts bracketing `value`.
    ///
    /// The first index is the post nearer the origin. Both indices are
    /// equal when `value` falls exactly on a post, when it lies past
    /// the last post, or when the axis has a single post. Returns
    /// `None` if `value` is outside this axis' extent.
    pub fn bracket(&self, value: C) -> Option<(usize, usize)> {
        if !self.contains(value) {
            return None;
        }
        if self.len == 1 {
            return Some((0, 0));
        }
        let last = self.len - 1;
        // Non-negative for any covered value, regardless of the
        // spacing's sign.
        let position = ((value - self.origin) / self.spacing).max(0.0);
        let lower = position.floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let lower_idx = (lower as usize).min(last);
        #[allow(clippy::float_cmp)]
        if position == lower || lower_idx == last {
            Some((lower_idx, lower_idx))
        } else {
            Some((lower_idx, lower_idx + 1))
        }
    }
}

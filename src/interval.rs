use std::{
    cmp::Ordering,
    fmt::{self, Display},
    ops::{Bound, Range, RangeBounds, RangeInclusive},
};

use crate::error::{Error, Result};

/// An immutable interval over a totally ordered scalar.
///
/// The default orientation is half-open, `[from, to)`, but either bound may be
/// inclusive or exclusive. An interval is never empty under its own flags:
/// `[7, 7]` is a valid single point, `[7, 7)` is rejected at construction.
///
/// Intervals are ordered by their lower bound (an inclusive lower bound sorts
/// before an exclusive one at the same value), then by their upper bound (an
/// exclusive upper bound sorts before an inclusive one).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    from: T,
    to: T,
    from_inclusive: bool,
    to_inclusive: bool,
}

/// `a` lies after `b`, or at `b` when `inclusive`.
fn is_after<T: Ord>(a: &T, b: &T, inclusive: bool) -> bool {
    match a.cmp(b) {
        Ordering::Greater => true,
        Ordering::Equal => inclusive,
        Ordering::Less => false,
    }
}

/// `a` lies before `b`, or at `b` when `inclusive`.
fn is_before<T: Ord>(a: &T, b: &T, inclusive: bool) -> bool {
    match a.cmp(b) {
        Ordering::Less => true,
        Ordering::Equal => inclusive,
        Ordering::Greater => false,
    }
}

impl<T: Ord> Interval<T> {
    /// Builds the half-open interval `[from, to)`.
    pub fn new(from: T, to: T) -> Result<Self> {
        Self::with_bounds(from, true, to, false)
    }

    /// Builds the closed interval `[from, to]`.
    pub fn closed(from: T, to: T) -> Result<Self> {
        Self::with_bounds(from, true, to, true)
    }

    /// Builds an interval with explicit inclusivity on each bound.
    ///
    /// Fails with [`Error::InvalidInterval`] if the interval would contain no
    /// point at all.
    pub fn with_bounds(from: T, from_inclusive: bool, to: T, to_inclusive: bool) -> Result<Self> {
        let interval = Self {
            from,
            to,
            from_inclusive,
            to_inclusive,
        };
        if interval.is_after_from(&interval.to) && interval.is_before_to(&interval.from) {
            Ok(interval)
        } else {
            Err(Error::InvalidInterval)
        }
    }

    /// The caller guarantees the bounds are non-empty.
    pub(crate) fn new_unchecked(from: T, from_inclusive: bool, to: T, to_inclusive: bool) -> Self {
        let interval = Self {
            from,
            to,
            from_inclusive,
            to_inclusive,
        };
        debug_assert!(interval.is_after_from(&interval.to) && interval.is_before_to(&interval.from));
        interval
    }

    pub fn from(&self) -> &T {
        &self.from
    }

    pub fn to(&self) -> &T {
        &self.to
    }

    pub fn is_from_inclusive(&self) -> bool {
        self.from_inclusive
    }

    pub fn is_to_inclusive(&self) -> bool {
        self.to_inclusive
    }

    /// `point` lies inside this interval.
    pub fn is_within(&self, point: &T) -> bool {
        self.is_after_from(point) && self.is_before_to(point)
    }

    /// `point` is not below the lower bound.
    pub fn is_after_from(&self, point: &T) -> bool {
        is_after(point, &self.from, self.from_inclusive)
    }

    /// `point` is not above the upper bound.
    pub fn is_before_to(&self, point: &T) -> bool {
        is_before(point, &self.to, self.to_inclusive)
    }

    /// Both intervals share at least one point.
    ///
    /// A bound shared by the two intervals only counts when both of them
    /// include it: `[2, 7)` does not overlap `[7, 10)`, but `[2, 7]` does.
    pub fn overlaps(&self, other: &Interval<T>) -> bool {
        let after_from = is_after(
            &other.to,
            &self.from,
            self.from_inclusive && other.to_inclusive,
        );
        let before_to = is_before(
            &other.from,
            &self.to,
            self.to_inclusive && other.from_inclusive,
        );
        after_from && before_to
    }
}

impl<T: Ord + Clone> Interval<T> {
    /// The tightest interval contained in both, or `None` if they do not
    /// overlap.
    ///
    /// Where the two bounds coincide the result includes the bound only if
    /// both operands do; otherwise the tighter operand decides.
    pub fn intersection(&self, other: &Interval<T>) -> Option<Interval<T>> {
        if !self.overlaps(other) {
            return None;
        }
        let (from, from_inclusive) = match self.from.cmp(&other.from) {
            Ordering::Equal => (
                self.from.clone(),
                self.from_inclusive && other.from_inclusive,
            ),
            Ordering::Greater => (self.from.clone(), self.from_inclusive),
            Ordering::Less => (other.from.clone(), other.from_inclusive),
        };
        let (to, to_inclusive) = match self.to.cmp(&other.to) {
            Ordering::Equal => (self.to.clone(), self.to_inclusive && other.to_inclusive),
            Ordering::Less => (self.to.clone(), self.to_inclusive),
            Ordering::Greater => (other.to.clone(), other.to_inclusive),
        };
        Some(Self::new_unchecked(from, from_inclusive, to, to_inclusive))
    }

    /// The smallest interval covering both operands.
    ///
    /// Where the two bounds coincide the result includes the bound if either
    /// operand does.
    pub fn hull(&self, other: &Interval<T>) -> Interval<T> {
        let (from, from_inclusive) = match self.from.cmp(&other.from) {
            Ordering::Equal => (
                self.from.clone(),
                self.from_inclusive || other.from_inclusive,
            ),
            Ordering::Less => (self.from.clone(), self.from_inclusive),
            Ordering::Greater => (other.from.clone(), other.from_inclusive),
        };
        let (to, to_inclusive) = match self.to.cmp(&other.to) {
            Ordering::Equal => (self.to.clone(), self.to_inclusive || other.to_inclusive),
            Ordering::Greater => (self.to.clone(), self.to_inclusive),
            Ordering::Less => (other.to.clone(), other.to_inclusive),
        };
        Self::new_unchecked(from, from_inclusive, to, to_inclusive)
    }

    /// Set subtraction: the parts of `self` not covered by `other`, in
    /// ascending order.
    ///
    /// Yields `[self]` when the two do not overlap, and otherwise zero, one or
    /// two fragments depending on how `other` sits over `self`.
    pub fn minus(&self, other: &Interval<T>) -> Result<Vec<Interval<T>>> {
        if !self.overlaps(other) {
            return Ok(vec![self.clone()]);
        }

        // Whether `other` reaches past each end of `self`, or stops strictly
        // inside it.
        let covers_start = match other.from.cmp(&self.from) {
            Ordering::Less => true,
            Ordering::Equal => other.from_inclusive || !self.from_inclusive,
            Ordering::Greater => false,
        };
        let starts_inside = match other.from.cmp(&self.from) {
            Ordering::Greater => true,
            Ordering::Equal => self.from_inclusive && !other.from_inclusive,
            Ordering::Less => false,
        };
        let covers_end = match other.to.cmp(&self.to) {
            Ordering::Greater => true,
            Ordering::Equal => other.to_inclusive || !self.to_inclusive,
            Ordering::Less => false,
        };
        let ends_inside = match other.to.cmp(&self.to) {
            Ordering::Less => true,
            Ordering::Equal => self.to_inclusive && !other.to_inclusive,
            Ordering::Greater => false,
        };

        match (covers_start, starts_inside, covers_end, ends_inside) {
            //     |-------|  self
            // |------|       other
            //        |----|  result
            (true, false, false, true) => Ok(vec![self.upper_remnant(other)?]),
            //     |-------|     self
            // |---------------| other
            (true, false, true, false) => Ok(vec![]),
            // |-------|     self
            //      |------| other
            // |----|        result
            (false, true, true, false) => Ok(vec![self.lower_remnant(other)?]),
            // |------------|  self
            //      |---|      other
            // |----|   |---|  result
            (false, true, false, true) => Ok(vec![
                self.lower_remnant(other)?,
                self.upper_remnant(other)?,
            ]),
            _ => Err(Error::UnknownTopology),
        }
    }

    fn lower_remnant(&self, other: &Interval<T>) -> Result<Interval<T>> {
        Self::with_bounds(
            self.from.clone(),
            self.from_inclusive,
            other.from.clone(),
            !other.from_inclusive,
        )
    }

    fn upper_remnant(&self, other: &Interval<T>) -> Result<Interval<T>> {
        Self::with_bounds(
            other.to.clone(),
            !other.to_inclusive,
            self.to.clone(),
            self.to_inclusive,
        )
    }
}

impl<T: Ord> PartialOrd for Interval<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Interval<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.from
            .cmp(&other.from)
            .then_with(|| other.from_inclusive.cmp(&self.from_inclusive))
            .then_with(|| self.to.cmp(&other.to))
            .then_with(|| self.to_inclusive.cmp(&other.to_inclusive))
    }
}

impl<T: Ord> TryFrom<Range<T>> for Interval<T> {
    type Error = Error;

    fn try_from(value: Range<T>) -> Result<Self> {
        Self::new(value.start, value.end)
    }
}

impl<T: Ord> TryFrom<RangeInclusive<T>> for Interval<T> {
    type Error = Error;

    fn try_from(value: RangeInclusive<T>) -> Result<Self> {
        let (from, to) = value.into_inner();
        Self::closed(from, to)
    }
}

impl<T> RangeBounds<T> for Interval<T> {
    fn start_bound(&self) -> Bound<&T> {
        if self.from_inclusive {
            Bound::Included(&self.from)
        } else {
            Bound::Excluded(&self.from)
        }
    }

    fn end_bound(&self) -> Bound<&T> {
        if self.to_inclusive {
            Bound::Included(&self.to)
        } else {
            Bound::Excluded(&self.to)
        }
    }
}

impl<T: Display> Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.from_inclusive { '[' } else { '(' };
        let close = if self.to_inclusive { ']' } else { ')' };
        write!(f, "{}{}, {}{}", open, self.from, self.to, close)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_utils::arbitrary_interval;

    fn iv(from: i32, to: i32) -> Interval<i32> {
        Interval::new(from, to).unwrap()
    }

    fn point(at: i32) -> Interval<i32> {
        Interval::closed(at, at).unwrap()
    }

    #[test]
    fn invalid_intervals() {
        assert_eq!(Interval::new(10, 10), Err(Error::InvalidInterval));
        assert_eq!(Interval::new(10, 9), Err(Error::InvalidInterval));
        assert_eq!(
            Interval::with_bounds(7, false, 7, true),
            Err(Error::InvalidInterval)
        );
        assert_eq!(
            Interval::with_bounds(7, false, 7, false),
            Err(Error::InvalidInterval)
        );
        assert!(Interval::closed(7, 7).is_ok());
        assert!(Interval::with_bounds(7, false, 8, false).is_ok());
    }

    #[test]
    fn after() {
        assert!(is_after(&2, &1, true));
        assert!(is_after(&2, &1, false));
        assert!(is_after(&2, &2, true));
        assert!(!is_after(&2, &2, false));
        assert!(!is_after(&2, &3, false));
        assert!(!is_after(&2, &3, true));
    }

    #[test]
    fn before() {
        assert!(!is_before(&2, &1, true));
        assert!(!is_before(&2, &1, false));
        assert!(is_before(&2, &2, true));
        assert!(!is_before(&2, &2, false));
        assert!(is_before(&2, &3, false));
        assert!(is_before(&2, &3, true));
    }

    #[test]
    fn within() {
        let interval = iv(2, 7);
        assert!(interval.is_within(&3));
        assert!(interval.is_within(&2));
        assert!(!interval.is_within(&7));
        assert!(!interval.is_within(&1));

        let open = Interval::with_bounds(2, false, 7, true).unwrap();
        assert!(!open.is_within(&2));
        assert!(open.is_within(&7));
    }

    #[test]
    fn overlaps() {
        let interval = iv(2, 7);

        assert!(!interval.overlaps(&iv(0, 1)));
        assert!(!interval.overlaps(&point(1)));
        assert!(!interval.overlaps(&iv(1, 2)));

        assert!(interval.overlaps(&iv(1, 3)));
        assert!(interval.overlaps(&point(2)));
        assert!(interval.overlaps(&iv(2, 3)));
        assert!(interval.overlaps(&point(3)));
        assert!(interval.overlaps(&iv(3, 7)));
        assert!(interval.overlaps(&iv(3, 10)));
        assert!(interval.overlaps(&iv(1, 8)));

        assert!(!interval.overlaps(&point(7)));
        assert!(!interval.overlaps(&iv(7, 10)));
        assert!(!interval.overlaps(&point(10)));
        assert!(!interval.overlaps(&iv(10, 15)));

        // A closed upper bound reaches a closed lower bound at the same point.
        let closed = Interval::closed(2, 7).unwrap();
        assert!(closed.overlaps(&point(7)));
        assert!(closed.overlaps(&iv(7, 10)));
        assert!(!closed.overlaps(&Interval::with_bounds(7, false, 10, false).unwrap()));
    }

    #[test]
    fn intersection() {
        let interval = iv(2, 7);
        assert_eq!(interval.intersection(&iv(3, 4)), Some(iv(3, 4)));
        assert_eq!(interval.intersection(&iv(3, 10)), Some(iv(3, 7)));
        assert_eq!(interval.intersection(&iv(0, 1)), None);

        // Equal bounds keep inclusivity only if both sides include them.
        let closed = Interval::closed(2, 7).unwrap();
        assert_eq!(closed.intersection(&interval), Some(iv(2, 7)));
        let open = Interval::with_bounds(2, false, 7, false).unwrap();
        assert_eq!(closed.intersection(&open), Some(open));
    }

    #[test]
    fn hull() {
        assert_eq!(iv(2, 7).hull(&iv(5, 10)), iv(2, 10));
        assert_eq!(iv(2, 7).hull(&iv(100, 101)), iv(2, 101));
        assert_eq!(
            iv(2, 7).hull(&Interval::closed(3, 7).unwrap()),
            Interval::closed(2, 7).unwrap()
        );
    }

    #[test]
    fn minus_non_overlap() {
        assert_eq!(iv(2, 7).minus(&iv(8, 10)), Ok(vec![iv(2, 7)]));
    }

    #[test]
    fn minus_covers_start() {
        assert_eq!(iv(2, 7).minus(&iv(1, 4)), Ok(vec![iv(4, 7)]));
    }

    #[test]
    fn minus_covers_all() {
        assert_eq!(iv(2, 7).minus(&iv(1, 8)), Ok(vec![]));
        assert_eq!(iv(2, 7).minus(&iv(2, 7)), Ok(vec![]));
    }

    #[test]
    fn minus_covers_end() {
        assert_eq!(iv(2, 7).minus(&iv(4, 8)), Ok(vec![iv(2, 4)]));
    }

    #[test]
    fn minus_inside() {
        assert_eq!(iv(2, 7).minus(&iv(4, 6)), Ok(vec![iv(2, 4), iv(6, 7)]));
    }

    #[test]
    fn minus_leaves_single_points() {
        // Removing the open interval (2, 7) from [2, 7] leaves both end points.
        let closed = Interval::closed(2, 7).unwrap();
        let open = Interval::with_bounds(2, false, 7, false).unwrap();
        assert_eq!(closed.minus(&open), Ok(vec![point(2), point(7)]));
    }

    #[test]
    fn minus_open_lower_bound() {
        let this = Interval::with_bounds(2, false, 7, false).unwrap();
        assert_eq!(this.minus(&iv(2, 4)), Ok(vec![iv(4, 7)]));
    }

    #[test]
    fn ordering() {
        let mut v = vec![
            iv(5, 10),
            Interval::closed(2, 7).unwrap(),
            Interval::with_bounds(2, false, 7, false).unwrap(),
            iv(2, 7),
            iv(1, 3),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                iv(1, 3),
                iv(2, 7),
                Interval::closed(2, 7).unwrap(),
                Interval::with_bounds(2, false, 7, false).unwrap(),
                iv(5, 10),
            ]
        );
    }

    #[test]
    fn conversions() {
        assert_eq!(Interval::try_from(2..7), Ok(iv(2, 7)));
        assert_eq!(Interval::try_from(7..7), Err(Error::InvalidInterval));
        assert_eq!(
            Interval::try_from(2..=7),
            Ok(Interval::closed(2, 7).unwrap())
        );

        let interval = iv(2, 7);
        assert_eq!(interval.start_bound(), Bound::Included(&2));
        assert_eq!(interval.end_bound(), Bound::Excluded(&7));
        assert!(RangeBounds::contains(&interval, &6));
        assert!(!RangeBounds::contains(&interval, &7));
    }

    #[test]
    fn display() {
        assert_eq!(iv(2, 7).to_string(), "[2, 7)");
        assert_eq!(
            Interval::with_bounds(2, false, 7, true).unwrap().to_string(),
            "(2, 7]"
        );
    }

    proptest! {
        /// The fragments of `a - b` together with `a ∩ b` cover exactly the
        /// points of `a`, and the fragments never touch `b`.
        ///
        /// Bounds are doubled so the odd probes land strictly between them.
        #[test]
        fn prop_minus_round_trip(a in arbitrary_interval(), b in arbitrary_interval()) {
            let fragments = a.minus(&b).unwrap();
            let overlap = a.intersection(&b);

            prop_assert!(fragments.len() <= 2);
            prop_assert!(fragments.windows(2).all(|w| w[0] < w[1]));

            for p in -1..=41 {
                let in_fragments = fragments.iter().any(|f| f.is_within(&p));
                let in_overlap = overlap.as_ref().map(|o| o.is_within(&p)).unwrap_or(false);

                prop_assert_eq!(a.is_within(&p), in_fragments || in_overlap);
                prop_assert!(!(in_fragments && b.is_within(&p)));
            }
        }

        /// Overlap is symmetric and agrees with a point-wise scan.
        #[test]
        fn prop_overlaps_point_scan(a in arbitrary_interval(), b in arbitrary_interval()) {
            let shared = (-1..=41).any(|p| a.is_within(&p) && b.is_within(&p));
            prop_assert_eq!(a.overlaps(&b), shared);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            prop_assert_eq!(a.intersection(&b).is_some(), shared);
        }

        /// The hull contains every point of both operands.
        #[test]
        fn prop_hull_covers(a in arbitrary_interval(), b in arbitrary_interval()) {
            let h = a.hull(&b);
            for p in -1..=41 {
                if a.is_within(&p) || b.is_within(&p) {
                    prop_assert!(h.is_within(&p));
                }
            }
        }
    }
}

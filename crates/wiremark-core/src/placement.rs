//! Manual marker placement.
//!
//! [`PlacementState`] is a pure state machine: every [`PlacementEvent`]
//! consumes the current state and returns the next one. A `Place` event maps
//! a pointer position inside the displayed image rectangle into normalized
//! space, optionally snaps it onto the horizontal or vertical line through
//! the active marker's predecessor, commits it, and advances the cursor.
//!
//! # Example
//!
//! ```
//! # use wiremark_core::geometry::{Point, Size};
//! # use wiremark_core::marker::{MarkerId, Variant};
//! # use wiremark_core::placement::{PlacementEvent, PlacementState};
//! let rect = Size::new(500.0, 500.0);
//! let state = PlacementState::new(Variant::ThreePoint)
//!     .apply(PlacementEvent::place(Point::new(250.0, 250.0), rect, false))
//!     .apply(PlacementEvent::place(Point::new(255.0, 400.0), rect, true));
//!
//! // The second click snapped onto the vertical line through marker 1.
//! let a = state.markers().lookup(MarkerId::PA).unwrap();
//! assert_eq!((a.x, a.y), (500.0, 800.0));
//! assert_eq!(state.active(), MarkerId::P2);
//! ```

use log::{debug, trace, warn};

use crate::{
    geometry::{Point, Size},
    marker::{MarkerId, MarkerMap, MarkerPosition, Variant},
};

/// An interaction that changes the placement state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementEvent {
    /// A click at `pointer`, relative to the top-left corner of the displayed
    /// image rectangle `rect`.
    Place { pointer: Point, rect: Size, snap: bool },
    /// Makes `MarkerId` the active marker.
    Select(MarkerId),
    /// Removes one marker without moving the cursor.
    Clear(MarkerId),
    /// Removes every marker and returns to the first one.
    Reset,
}

impl PlacementEvent {
    pub fn place(pointer: Point, rect: Size, snap: bool) -> Self {
        Self::Place {
            pointer,
            rect,
            snap,
        }
    }
}

/// The marker under construction and the map built so far.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementState {
    active: MarkerId,
    markers: MarkerMap,
}

impl PlacementState {
    /// Starts an empty placement at the variant's first marker.
    pub fn new(variant: Variant) -> Self {
        Self::from_map(MarkerMap::new(variant))
    }

    /// Continues placement on top of an existing map, for example one
    /// returned by a detector, starting at the first marker.
    pub fn from_map(markers: MarkerMap) -> Self {
        Self {
            active: markers.variant().first(),
            markers,
        }
    }

    pub fn variant(&self) -> Variant {
        self.markers.variant()
    }

    /// The marker the next `Place` event commits.
    pub fn active(&self) -> MarkerId {
        self.active
    }

    pub fn markers(&self) -> &MarkerMap {
        &self.markers
    }

    pub fn into_markers(self) -> MarkerMap {
        self.markers
    }

    /// Applies one event and returns the resulting state.
    ///
    /// Events never fail. Events naming a marker outside the variant, and
    /// clicks on an empty rectangle, leave the state unchanged.
    pub fn apply(self, event: PlacementEvent) -> Self {
        trace!(event:? = event, active:% = self.active; "Applying placement event");
        match event {
            PlacementEvent::Place {
                pointer,
                rect,
                snap,
            } => self.place_at(pointer, rect, snap),
            PlacementEvent::Select(marker) => self.select(marker),
            PlacementEvent::Clear(marker) => self.clear(marker),
            PlacementEvent::Reset => Self::new(self.variant()),
        }
    }

    /// Commits a click to the active marker and advances the cursor.
    ///
    /// With `snap` set and the active marker's predecessor already placed,
    /// the position is projected onto the axis line through the predecessor
    /// (see [`snap_to_axis`]). After the last marker the cursor stays put, so
    /// further clicks reposition it.
    pub fn place_at(mut self, pointer: Point, rect: Size, snap: bool) -> Self {
        if rect.is_empty() {
            debug!(
                width = rect.width(),
                height = rect.height();
                "Ignoring click on an empty image rectangle"
            );
            return self;
        }

        let mut position = MarkerPosition::from_pixel(pointer, rect);
        if snap {
            let anchor = self
                .variant()
                .predecessor(self.active)
                .and_then(|predecessor| self.markers.lookup(predecessor));
            if let Some(anchor) = anchor {
                position = snap_to_axis(position, anchor);
            }
        }

        if let Err(err) = self.markers.insert(self.active, position) {
            warn!(err:% = err; "Active marker rejected by its own map");
            return self;
        }
        debug!(
            marker:% = self.active,
            x = position.x,
            y = position.y;
            "Placed marker"
        );

        if let Some(next) = self.variant().next(self.active) {
            self.active = next;
        }
        self
    }

    fn select(mut self, marker: MarkerId) -> Self {
        if self.variant().contains(marker) {
            self.active = marker;
        } else {
            debug!(marker:% = marker, variant:% = self.variant(); "Ignoring foreign marker selection");
        }
        self
    }

    fn clear(mut self, marker: MarkerId) -> Self {
        self.markers.remove(marker);
        self
    }
}

/// Projects `candidate` onto the horizontal or vertical line through `anchor`.
///
/// Whichever axis the candidate is closer to wins: if its horizontal distance
/// is strictly smaller it moves onto the vertical line (`x := anchor.x`),
/// otherwise onto the horizontal line (`y := anchor.y`). Equal distances
/// therefore snap to the horizontal line.
pub fn snap_to_axis(candidate: MarkerPosition, anchor: MarkerPosition) -> MarkerPosition {
    let dx = (candidate.x - anchor.x).abs();
    let dy = (candidate.y - anchor.y).abs();
    if dx < dy {
        MarkerPosition::new(anchor.x, candidate.y)
    } else {
        MarkerPosition::new(candidate.x, anchor.y)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    /// A 1000x1000 rectangle makes pixel and normalized coordinates equal.
    fn unit_rect() -> Size {
        Size::new(1000.0, 1000.0)
    }

    fn click(state: PlacementState, x: f32, y: f32, snap: bool) -> PlacementState {
        state.apply(PlacementEvent::place(Point::new(x, y), unit_rect(), snap))
    }

    #[test]
    fn test_place_normalizes_pointer() {
        let state = PlacementState::new(Variant::FourPoint).apply(PlacementEvent::place(
            Point::new(80.0, 30.0),
            Size::new(320.0, 240.0),
            false,
        ));

        let p1 = state.markers().lookup(MarkerId::P1).unwrap();
        assert_approx_eq!(f32, p1.x, 250.0);
        assert_approx_eq!(f32, p1.y, 125.0);
    }

    #[test]
    fn test_auto_advance_stays_on_last() {
        let mut state = PlacementState::new(Variant::ThreePoint);
        assert_eq!(state.active(), MarkerId::P1);

        state = click(state, 100.0, 100.0, false);
        assert_eq!(state.active(), MarkerId::PA);
        state = click(state, 200.0, 200.0, false);
        assert_eq!(state.active(), MarkerId::P2);
        state = click(state, 300.0, 300.0, false);
        assert_eq!(state.active(), MarkerId::P2);

        // A fourth click repositions the last marker.
        state = click(state, 400.0, 400.0, false);
        assert_eq!(state.active(), MarkerId::P2);
        assert_eq!(
            state.markers().lookup(MarkerId::P2),
            Some(MarkerPosition::new(400.0, 400.0))
        );
        assert_eq!(state.markers().len(), 3);
    }

    #[test]
    fn test_snap_tie_goes_horizontal() {
        let state = click(PlacementState::new(Variant::ThreePoint), 500.0, 500.0, false);
        let state = click(state, 520.0, 480.0, true);
        assert_eq!(
            state.markers().lookup(MarkerId::PA),
            Some(MarkerPosition::new(520.0, 500.0))
        );
    }

    #[test]
    fn test_snap_closer_to_horizontal_line() {
        let state = click(PlacementState::new(Variant::ThreePoint), 500.0, 500.0, false);
        let state = click(state, 520.0, 495.0, true);
        assert_eq!(
            state.markers().lookup(MarkerId::PA),
            Some(MarkerPosition::new(520.0, 500.0))
        );
    }

    #[test]
    fn test_snap_closer_to_vertical_line() {
        let state = click(PlacementState::new(Variant::ThreePoint), 500.0, 500.0, false);
        let state = click(state, 505.0, 480.0, true);
        assert_eq!(
            state.markers().lookup(MarkerId::PA),
            Some(MarkerPosition::new(500.0, 480.0))
        );
    }

    #[test]
    fn test_snap_without_predecessor_is_noop() {
        // P1 has no predecessor.
        let state = click(PlacementState::new(Variant::ThreePoint), 123.0, 456.0, true);
        assert_eq!(
            state.markers().lookup(MarkerId::P1),
            Some(MarkerPosition::new(123.0, 456.0))
        );

        // P3 starts the second pair of the four-point variant.
        let state = PlacementState::new(Variant::FourPoint);
        let state = click(state, 100.0, 100.0, false);
        let state = click(state, 900.0, 110.0, true);
        let state = click(state, 105.0, 700.0, true);
        assert_eq!(
            state.markers().lookup(MarkerId::P2),
            Some(MarkerPosition::new(900.0, 100.0))
        );
        assert_eq!(
            state.markers().lookup(MarkerId::P3),
            Some(MarkerPosition::new(105.0, 700.0))
        );
    }

    #[test]
    fn test_snap_with_missing_predecessor_is_noop() {
        let state = PlacementState::new(Variant::ThreePoint)
            .apply(PlacementEvent::Select(MarkerId::PA));
        let state = click(state, 520.0, 480.0, true);
        assert_eq!(
            state.markers().lookup(MarkerId::PA),
            Some(MarkerPosition::new(520.0, 480.0))
        );
    }

    #[test]
    fn test_out_of_bounds_click_is_kept() {
        let state = click(PlacementState::new(Variant::FourPoint), -50.0, 1200.0, false);
        assert_eq!(
            state.markers().lookup(MarkerId::P1),
            Some(MarkerPosition::new(-50.0, 1200.0))
        );
    }

    #[test]
    fn test_empty_rect_is_ignored() {
        let state = PlacementState::new(Variant::FourPoint).apply(PlacementEvent::place(
            Point::new(10.0, 10.0),
            Size::new(0.0, 200.0),
            false,
        ));
        assert!(state.markers().is_empty());
        assert_eq!(state.active(), MarkerId::P1);
    }

    #[test]
    fn test_select_and_clear() {
        let state = click(PlacementState::new(Variant::ThreePoint), 100.0, 100.0, false);
        let state = click(state, 200.0, 200.0, false);

        let state = state.apply(PlacementEvent::Select(MarkerId::P1));
        assert_eq!(state.active(), MarkerId::P1);

        let state = state.apply(PlacementEvent::Clear(MarkerId::PA));
        assert_eq!(state.active(), MarkerId::P1);
        assert!(state.markers().lookup(MarkerId::PA).is_none());
        assert!(state.markers().lookup(MarkerId::P1).is_some());

        // Markers of another variant are not selectable.
        let state = state.apply(PlacementEvent::Select(MarkerId::P4));
        assert_eq!(state.active(), MarkerId::P1);
    }

    #[test]
    fn test_placing_does_not_clear_others() {
        let state = click(PlacementState::new(Variant::FourPoint), 100.0, 100.0, false);
        let state = click(state, 200.0, 100.0, false);
        let state = state.apply(PlacementEvent::Select(MarkerId::P1));
        let state = click(state, 150.0, 150.0, false);
        assert_eq!(state.markers().len(), 2);
        assert_eq!(state.active(), MarkerId::P2);
    }

    #[test]
    fn test_reset() {
        let state = click(PlacementState::new(Variant::FourPoint), 1.0, 2.0, false);
        let state = click(state, 3.0, 4.0, false);
        let state = state.apply(PlacementEvent::Reset);
        assert!(state.markers().is_empty());
        assert_eq!(state.active(), MarkerId::P1);
        assert_eq!(state.variant(), Variant::FourPoint);
    }

    #[test]
    fn test_from_map_keeps_positions() {
        let mut map = MarkerMap::new(Variant::ThreePoint);
        map.insert(MarkerId::P2, MarkerPosition::new(10.0, 20.0))
            .unwrap();
        let state = PlacementState::from_map(map.clone());
        assert_eq!(state.active(), MarkerId::P1);
        assert_eq!(state.into_markers(), map);
    }

    proptest! {
        #[test]
        fn prop_snap_lands_on_an_axis(
            cx in -2000.0f32..2000.0,
            cy in -2000.0f32..2000.0,
            ax in 0.0f32..1000.0,
            ay in 0.0f32..1000.0,
        ) {
            let snapped = snap_to_axis(MarkerPosition::new(cx, cy), MarkerPosition::new(ax, ay));
            prop_assert!(snapped.x == ax || snapped.y == ay);
            // At least one coordinate survives from the candidate.
            prop_assert!(snapped.x == cx || snapped.y == cy);
        }

        #[test]
        fn prop_snap_moves_the_shorter_distance(
            cx in 0.0f32..1000.0,
            cy in 0.0f32..1000.0,
            ax in 0.0f32..1000.0,
            ay in 0.0f32..1000.0,
        ) {
            let candidate = MarkerPosition::new(cx, cy);
            let snapped = snap_to_axis(candidate, MarkerPosition::new(ax, ay));
            let moved = (snapped.x - cx).abs() + (snapped.y - cy).abs();
            let shorter = (cx - ax).abs().min((cy - ay).abs());
            prop_assert!((moved - shorter).abs() < 1e-3);
        }

        #[test]
        fn prop_place_never_fails(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
            w in 1.0f32..4000.0,
            h in 1.0f32..4000.0,
            snap in any::<bool>(),
        ) {
            let state = PlacementState::new(Variant::FourPoint);
            let rect = Size::new(w, h);
            let state = state.apply(PlacementEvent::place(Point::new(10.0, 10.0), rect, false));
            let state = state.apply(PlacementEvent::place(Point::new(x, y), rect, snap));
            prop_assert_eq!(state.markers().len(), 2);
            prop_assert_eq!(state.active(), MarkerId::P3);
        }
    }
}

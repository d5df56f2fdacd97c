use crate::dashboard::grid::{clamp_column, clamp_width, GRID_COLUMNS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Stable widget identifier from the registry.
pub type WidgetId = String;

/// Width used when neither an override nor a registry default is known.
pub const FALLBACK_WIDGET_WIDTH: u32 = 4;

/// Largest ring searched around a preferred cell.
const SPIRAL_RADIUS: i64 = 10;

/// Rows covered by the row-major fallback scan before extending past it.
const FALLBACK_SCAN_ROWS: u32 = 50;

/// Deepest row a stored entry may claim.
pub const MAX_LAYOUT_ROW: u32 = FALLBACK_SCAN_ROWS * 20;

/// Grid position and width of a single widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub row: u32,
    pub col: u32,
    pub width: u32,
}

impl LayoutEntry {
    /// Last column covered by the entry.
    pub fn last_col(&self) -> u32 {
        self.col.saturating_add(self.width.max(1) - 1)
    }

    pub fn overlaps(&self, other: &LayoutEntry) -> bool {
        self.row == other.row && self.col <= other.last_col() && other.col <= self.last_col()
    }

    pub fn is_in_bounds(&self) -> bool {
        (1..=MAX_LAYOUT_ROW).contains(&self.row)
            && (1..=GRID_COLUMNS).contains(&self.width)
            && (1..=GRID_COLUMNS + 1 - self.width).contains(&self.col)
    }

    fn sort_key(&self) -> u64 {
        self.row as u64 * GRID_COLUMNS as u64 + self.col as u64
    }
}

/// Committed mapping from widget id to grid position.
///
/// Replaced wholesale on every transition; nothing hands out a mutable view of
/// the committed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    entries: BTreeMap<WidgetId, LayoutEntry>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&LayoutEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn insert(&mut self, id: impl Into<WidgetId>, entry: LayoutEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn remove(&mut self, id: &str) -> Option<LayoutEntry> {
        self.entries.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WidgetId, &LayoutEntry)> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &WidgetId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last row used by any entry, 0 when empty.
    pub fn rows(&self) -> u32 {
        self.entries.values().map(|e| e.row).max().unwrap_or(0)
    }

    /// Ids of entries other than `skip` that overlap `entry`.
    pub fn overlapping(&self, entry: &LayoutEntry, skip: &str) -> Vec<WidgetId> {
        self.entries
            .iter()
            .filter(|(id, other)| id.as_str() != skip && other.overlaps(entry))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// First pair of entries breaking the no-overlap invariant.
    pub fn first_overlap(&self) -> Option<(WidgetId, WidgetId)> {
        let entries: Vec<_> = self.entries.iter().collect();
        for (i, (a_id, a)) in entries.iter().enumerate() {
            for (b_id, b) in &entries[i + 1..] {
                if a.overlaps(b) {
                    return Some(((*a_id).clone(), (*b_id).clone()));
                }
            }
        }
        None
    }

    /// Entries of `self`, with `fallback` filling ids missing from `self`.
    pub fn with_fallback(&self, fallback: &Layout) -> Layout {
        let mut merged = fallback.clone();
        for (id, entry) in &self.entries {
            merged.entries.insert(id.clone(), *entry);
        }
        merged
    }
}

impl FromIterator<(WidgetId, LayoutEntry)> for Layout {
    fn from_iter<T: IntoIterator<Item = (WidgetId, LayoutEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Per-widget width overrides layered over registry defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetWidths {
    overrides: BTreeMap<WidgetId, u32>,
    defaults: BTreeMap<WidgetId, u32>,
}

impl WidgetWidths {
    pub fn new(defaults: BTreeMap<WidgetId, u32>) -> Self {
        Self {
            overrides: BTreeMap::new(),
            defaults,
        }
    }

    pub fn with_overrides(mut self, overrides: BTreeMap<WidgetId, u32>) -> Self {
        self.overrides = overrides
            .into_iter()
            .map(|(id, w)| (id, clamp_width(w)))
            .collect();
        self
    }

    pub fn width_of(&self, id: &str) -> u32 {
        let width = self
            .overrides
            .get(id)
            .or_else(|| self.defaults.get(id))
            .copied()
            .unwrap_or(FALLBACK_WIDGET_WIDTH);
        clamp_width(width)
    }

    /// Store an override, clamped to the grid. Returns the stored width.
    pub fn set(&mut self, id: impl Into<WidgetId>, width: u32) -> u32 {
        let width = clamp_width(width);
        self.overrides.insert(id.into(), width);
        width
    }

    pub fn overrides(&self) -> &BTreeMap<WidgetId, u32> {
        &self.overrides
    }
}

/// Packing hint that places one widget ahead of all others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedPlacement {
    pub id: WidgetId,
    pub row: u32,
    pub col: u32,
}

/// Scratch occupancy for one packing call.
#[derive(Default)]
struct Packer {
    occupied: HashSet<(u32, u32)>,
    placed: HashSet<WidgetId>,
    layout: Layout,
    max_row: u32,
}

impl Packer {
    fn seeded(layout: &Layout) -> Self {
        let mut packer = Self::default();
        for (id, entry) in layout.iter() {
            packer.place(id, entry.row, entry.col, entry.width);
        }
        packer
    }

    fn fits(&self, row: u32, col: u32, width: u32) -> bool {
        (col..col + width).all(|c| !self.occupied.contains(&(row, c)))
    }

    fn place(&mut self, id: &str, row: u32, col: u32, width: u32) {
        for c in col..col + width {
            self.occupied.insert((row, c));
        }
        self.max_row = self.max_row.max(row);
        self.placed.insert(id.to_string());
        self.layout.insert(id, LayoutEntry { row, col, width });
    }

    fn try_place(&mut self, id: &str, row: u32, col: u32, width: u32) -> bool {
        if self.fits(row, col, width) {
            self.place(id, row, col, width);
            true
        } else {
            false
        }
    }

    fn find_best_fit(&mut self, id: &str, preferred_row: u32, preferred_col: i64, width: u32) {
        let width = clamp_width(width);
        let preferred_row = preferred_row.max(1);
        let col = clamp_column(preferred_col, width) as i64;

        if self.try_place(id, preferred_row, col as u32, width) {
            return;
        }

        for radius in 1..=SPIRAL_RADIUS {
            for offset in -radius..=radius {
                let test_col = clamp_column(col + offset, width);
                if self.try_place(id, preferred_row, test_col, width) {
                    return;
                }
            }
            for row_offset in -radius..=radius {
                let test_row =
                    (preferred_row as i64 + row_offset).clamp(1, u32::MAX as i64) as u32;
                if test_row == preferred_row {
                    continue;
                }
                for offset in -radius..=radius {
                    let test_col = clamp_column(col + offset, width);
                    if self.try_place(id, test_row, test_col, width) {
                        return;
                    }
                }
            }
        }

        if self.first_fit(id, width) {
            tracing::debug!(widget = id, "fallback scan exhausted, extending past bound");
        }
    }

    /// Place at the first free cell in row-major order. Returns `true` when the
    /// scan had to go past [`FALLBACK_SCAN_ROWS`].
    fn first_fit(&mut self, id: &str, width: u32) -> bool {
        let width = clamp_width(width);
        // Rows past the highest occupied one are always free, so this terminates.
        let last_row = FALLBACK_SCAN_ROWS.max(self.max_row.saturating_add(1));
        for row in 1..=last_row {
            for test_col in 1..=GRID_COLUMNS - width + 1 {
                if self.try_place(id, row, test_col, width) {
                    return row > FALLBACK_SCAN_ROWS;
                }
            }
        }
        false
    }
}

/// Produce an overlap-free layout for `active_ids`, keeping widgets as close
/// to their `previous` position as possible.
pub fn pack(
    active_ids: &[WidgetId],
    widths: &WidgetWidths,
    previous: &Layout,
    forced: Option<&ForcedPlacement>,
) -> Layout {
    let mut packer = Packer::default();

    if let Some(forced) = forced.filter(|f| active_ids.contains(&f.id)) {
        let width = widths.width_of(&forced.id);
        packer.find_best_fit(&forced.id, forced.row, forced.col as i64, width);
    }

    let mut pending: Vec<&WidgetId> = active_ids
        .iter()
        .filter(|id| !packer.placed.contains(*id))
        .collect();
    pending.sort_by_key(|id| previous.get(id).map_or(u64::MAX, LayoutEntry::sort_key));

    for id in pending {
        if packer.placed.contains(id) {
            continue;
        }
        let width = widths.width_of(id);
        match previous.get(id) {
            Some(prev) => packer.find_best_fit(id, prev.row, prev.col as i64, width),
            None => {
                packer.first_fit(id, width);
            }
        }
    }

    packer.layout
}

/// Place `id` into an existing valid `layout` without moving anything else,
/// searching from `preferred` the same way [`pack`] does.
pub fn place_into(layout: &Layout, id: &str, preferred: (u32, u32), width: u32) -> LayoutEntry {
    let mut packer = Packer::seeded(layout);
    packer.find_best_fit(id, preferred.0, preferred.1 as i64, width);
    packer.layout.get(id).copied().unwrap_or(LayoutEntry {
        row: packer.max_row.saturating_add(1),
        col: 1,
        width: clamp_width(width),
    })
}

use crate::models::{Catalog, MediaKind};

/// What a tile is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileDisplay {
    /// Waiting for the decoder (images) or the stream (videos).
    Loading,
    /// The real media is visible.
    Ready,
    /// Loading failed; the fixed placeholder is shown and never retried.
    Placeholder,
}

/// Where a click on a tile landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileHit {
    Surface,
    DetachControl,
}

/// Events a tile reports to the grid's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEvent {
    /// Primary action: open the viewer at this index.
    Open(usize),
    /// Secondary action on video tiles: request detached presentation.
    Detach(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileState {
    pub kind: MediaKind,
    pub display: TileDisplay,
}

/// Display state for every tile in the grid, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct GridState {
    tiles: Vec<TileState>,
}

impl GridState {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            tiles: catalog
                .iter()
                .map(|item| TileState {
                    kind: item.kind,
                    display: TileDisplay::Loading,
                })
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[cfg(test)]
    pub fn tile(&self, index: usize) -> Option<TileState> {
        self.tiles.get(index).copied()
    }

    /// Record the outcome of loading tile `index`. A tile that already fell
    /// back to the placeholder stays there. Returns the new display state.
    pub fn finish_load(&mut self, index: usize, ok: bool) -> Option<TileDisplay> {
        let tile = self.tiles.get_mut(index)?;
        if tile.display == TileDisplay::Placeholder {
            return Some(tile.display);
        }
        tile.display = if ok {
            TileDisplay::Ready
        } else {
            TileDisplay::Placeholder
        };
        Some(tile.display)
    }

    /// Turn a click into an event. Clicks on the detach control never open
    /// the viewer, and only video tiles have that control.
    pub fn route_click(&self, index: usize, hit: TileHit) -> Option<TileEvent> {
        let tile = self.tiles.get(index)?;
        match hit {
            TileHit::Surface => Some(TileEvent::Open(index)),
            TileHit::DetachControl if tile.kind.is_video() => Some(TileEvent::Detach(index)),
            TileHit::DetachControl => None,
        }
    }

    /// Like `route_click`, for the `n_press`-th press of a multi-click.
    /// Only the first press of a sequence counts, so a double click opens
    /// the viewer once.
    pub fn route_press(&self, index: usize, hit: TileHit, n_press: i32) -> Option<TileEvent> {
        if n_press != 1 {
            return None;
        }
        self.route_click(index, hit)
    }

    pub fn placeholder_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.display == TileDisplay::Placeholder)
            .count()
    }
}

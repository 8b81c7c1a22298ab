use super::{DeviceGrid, GridCell};

pub struct CellCoordIter<'a> {
    xsi: u32,
    inner: std::iter::Enumerate<std::slice::Iter<'a, GridCell>>,
}

impl<'a> CellCoordIter<'a> {
    pub(super) fn new(parent: &'a DeviceGrid) -> Self {
        Self {
            xsi: parent.xsi,
            inner: parent.cells.iter().enumerate(),
        }
    }
}

impl<'a> Iterator for CellCoordIter<'a> {
    type Item = ((u32, u32), &'a GridCell);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(i, v)| {
            // Recompute the coordinates from the flat index instead of tracking them
            let i = i as u32;
            let x = i / self.xsi;
            let y = i % self.xsi;
            ((x, y), v)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

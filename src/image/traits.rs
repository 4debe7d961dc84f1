//! Row access shared by gray views, float rasters and masks.

/// Read access to a row-major raster.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Elements between the starts of consecutive rows.
    fn stride(&self) -> usize;

    /// The `width()` pixels of row `y`.
    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows {
            image: self,
            next: 0,
        }
    }

    /// `width × height`.
    fn area(&self) -> usize {
        self.width() * self.height()
    }
}

/// Write access to the rows of an [`ImageView`].
pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}

/// Iterator over the rows of an [`ImageView`], top to bottom.
pub struct Rows<'a, I: ImageView> {
    image: &'a I,
    next: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        let y = self.next;
        (y < self.image.height()).then(|| {
            self.next += 1;
            self.image.row(y)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.image.height().saturating_sub(self.next);
        (left, Some(left))
    }
}

use crate::foundation::error::CopGifResult;
use crate::raster::raster::Raster;
use std::ops::Deref;

/// Provider of time-varying rasters.
///
/// Rasters are lent out by [`ImageSource::resolve_raster`] and must be handed back through
/// [`ImageSource::release`]. Prefer [`RasterGuard::acquire`], which releases on every exit path.
pub trait ImageSource {
    /// Resolve `path` to the full path of an image-bearing node, or `None` if it names nothing
    /// that can produce rasters.
    fn full_path(&self, path: &str) -> Option<String>;

    /// Resolve the raster of `plane` on the node at `full_path` for `time` (seconds).
    ///
    /// `Ok(None)` means "not found" and is a normal outcome.
    fn resolve_raster(
        &mut self,
        full_path: &str,
        plane: &str,
        time: f64,
    ) -> CopGifResult<Option<Raster>>;

    /// Return a raster obtained from [`ImageSource::resolve_raster`].
    fn release(&mut self, raster: Raster);
}

impl<S: ImageSource + ?Sized> ImageSource for Box<S> {
    fn full_path(&self, path: &str) -> Option<String> {
        (**self).full_path(path)
    }

    fn resolve_raster(
        &mut self,
        full_path: &str,
        plane: &str,
        time: f64,
    ) -> CopGifResult<Option<Raster>> {
        (**self).resolve_raster(full_path, plane, time)
    }

    fn release(&mut self, raster: Raster) {
        (**self).release(raster)
    }
}

/// Scoped loan of a raster; returns it to its source when dropped.
pub struct RasterGuard<'a, S: ImageSource + ?Sized> {
    source: &'a mut S,
    raster: Raster,
}

impl<'a, S: ImageSource + ?Sized> RasterGuard<'a, S> {
    /// Resolve a raster and wrap it in a guard. `Ok(None)` when the source has no raster.
    pub fn acquire(
        source: &'a mut S,
        full_path: &str,
        plane: &str,
        time: f64,
    ) -> CopGifResult<Option<Self>> {
        let raster = source.resolve_raster(full_path, plane, time)?;
        Ok(raster.map(|raster| Self { source, raster }))
    }
}

impl<S: ImageSource + ?Sized> Deref for RasterGuard<'_, S> {
    type Target = Raster;

    fn deref(&self) -> &Raster {
        &self.raster
    }
}

impl<S: ImageSource + ?Sized> Drop for RasterGuard<'_, S> {
    fn drop(&mut self) {
        let raster = std::mem::replace(&mut self.raster, Raster::empty());
        self.source.release(raster);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/provider.rs"]
mod tests;

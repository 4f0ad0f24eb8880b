/// Supplies face images (at least one per pair) and the shared back image.
///
/// Images are opaque handles; the core never looks inside them.
pub trait AssetProvider {
    type Image: Clone + PartialEq;

    fn faces(&self) -> &[Self::Image];

    fn back(&self) -> &Self::Image;
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageSet<I> {
    faces: Vec<I>,
    back: I,
}

impl<I> ImageSet<I> {
    pub fn new(faces: Vec<I>, back: I) -> Self {
        Self { faces, back }
    }
}

impl<I: Clone + PartialEq> AssetProvider for ImageSet<I> {
    type Image = I;

    fn faces(&self) -> &[I] {
        &self.faces
    }

    fn back(&self) -> &I {
        &self.back
    }
}

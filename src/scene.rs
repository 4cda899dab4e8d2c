pub(crate) mod canvas_image;
pub(crate) mod model;
pub(crate) mod overlay;

pub mod synthetic_image;

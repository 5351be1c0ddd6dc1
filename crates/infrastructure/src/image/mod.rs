pub mod http_origin;
pub mod svg_placeholder;

pub use http_origin::HttpImageOrigin;
pub use svg_placeholder::SvgPlaceholderRenderer;

pub mod generator;
pub mod http;

pub use generator::{GeneratedImage, ImageGenerator, OpenAiImageClient};
pub use http::{build_router, generate_inner, start_server, GenerateImageRequest, ProxyState};

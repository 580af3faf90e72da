pub mod gpt_oss;

pub use gpt_oss::GptOssParser;

pub mod coaching_llm;
pub mod sentiment;

pub use coaching_llm::OpenAiCoachingAdapter;
pub use sentiment::HttpSentimentAdapter;

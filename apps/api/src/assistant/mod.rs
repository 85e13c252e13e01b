// Chat assistant: forwards a visitor's question to the LLM with a fixed
// persona prompt. Stateless; the client resends recent history each call.

pub mod handlers;
pub mod prompts;

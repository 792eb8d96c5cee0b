/// Pattern definitions for the project analyzer
///
/// This module contains the pattern catalog used to detect AI/LLM libraries,
/// general frameworks, hardcoded credentials, environment variable usage and
/// high-level architecture patterns in Python source text.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Label emitted when a class subclasses `BaseModel`
pub const PYDANTIC_MODELS: &str = "Pydantic Models";
/// Label emitted when an `async def` is present
pub const ASYNC_AWAIT_PATTERN: &str = "Async/Await Pattern";
/// Label emitted when route decorators are present
pub const REST_API: &str = "REST API";
/// Label emitted for Service/Repository/Controller classes
pub const SERVICE_LAYER_PATTERN: &str = "Service Layer Pattern";
/// Label emitted for any class declaration
pub const OBJECT_ORIENTED_PROGRAMMING: &str = "Object-Oriented Programming";
/// Label emitted for functions with a return annotation
pub const TYPE_HINTS: &str = "Type Hints";

/// A labelled, compiled detection pattern
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Human-readable label reported when the pattern matches
    pub label: String,
    /// Compiled expression
    pub regex: Regex,
}

/// Read-only table of every pattern the analyzer evaluates.
///
/// Entries keep their declaration order, which is also the order labels are
/// listed in per-file details.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    pub llm_libraries: Vec<CatalogEntry>,
    pub frameworks: Vec<CatalogEntry>,
    pub credentials: Vec<Regex>,
    pub env_usage: Vec<Regex>,
    pub architecture: Vec<CatalogEntry>,
}

/// Get import signatures for AI and LLM client libraries.
pub fn get_llm_patterns() -> Vec<(&'static str, &'static str)> {
    vec![
        ("OpenAI", r"import openai|from openai"),
        ("Anthropic (Claude)", r"import anthropic|from anthropic"),
        ("LangChain", r"import langchain|from langchain"),
        ("Hugging Face", r"import transformers|from transformers|import huggingface"),
        ("Google AI (Gemini)", r"import google\.generativeai|from google\.generativeai"),
        ("Cohere", r"import cohere|from cohere"),
        ("LlamaIndex", r"import llama_index|from llama_index"),
        ("Replicate", r"import replicate|from replicate"),
        ("Together AI", r"import together|from together"),
        ("Groq", r"import groq|from groq"),
        ("Ollama", r"import ollama|from ollama"),
        ("Mistral AI", r"import mistralai|from mistralai"),
    ]
}

/// Get import signatures for general-purpose frameworks and libraries.
pub fn get_framework_patterns() -> Vec<(&'static str, &'static str)> {
    vec![
        ("FastAPI", r"from fastapi|import fastapi"),
        ("Flask", r"from flask|import flask"),
        ("Django", r"from django|import django"),
        ("Streamlit", r"import streamlit"),
        ("Gradio", r"import gradio"),
        ("PyTorch", r"import torch"),
        ("TensorFlow", r"import tensorflow"),
        ("NumPy", r"import numpy"),
        ("Pandas", r"import pandas"),
        ("SQLAlchemy", r"from sqlalchemy|import sqlalchemy"),
        ("Pydantic", r"from pydantic|import pydantic"),
        ("Requests", r"import requests"),
        ("AsyncIO", r"import asyncio"),
        ("Celery", r"from celery|import celery"),
        ("Redis", r"import redis"),
        ("MongoDB", r"import pymongo|from pymongo"),
    ]
}

/// Get `<keyword> = "<literal>"` expressions, in evaluation order.
pub fn get_credential_patterns() -> Vec<&'static str> {
    vec![
        r#"api[_-]?key\s*=\s*["'][^"']+["']"#,
        r#"secret\s*=\s*["'][^"']+["']"#,
        r#"token\s*=\s*["'][^"']+["']"#,
        r#"password\s*=\s*["'][^"']+["']"#,
    ]
}

/// Get environment variable access expressions. These are matched case-sensitively.
pub fn get_env_usage_patterns() -> Vec<&'static str> {
    vec![r"os\.getenv", r"os\.environ", r"load_dotenv"]
}

/// Get architecture patterns. These are matched case-sensitively.
pub fn get_architecture_patterns() -> Vec<(&'static str, &'static str)> {
    vec![
        (PYDANTIC_MODELS, r"class.*\(.*BaseModel.*\)"),
        (ASYNC_AWAIT_PATTERN, r"async def"),
        (REST_API, r"@app\.route|@router\.|@api\."),
        (SERVICE_LAYER_PATTERN, r"class.*Service|class.*Repository|class.*Controller"),
        (OBJECT_ORIENTED_PROGRAMMING, r"class\s+\w+.*:"),
        (TYPE_HINTS, r"def\s+\w+\(.*\)\s*->"),
    ]
}

/// Helper function to compile pattern
pub fn compile_pattern(pattern: &str, case_insensitive: bool) -> Option<Regex> {
    match RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::error!("Error compiling pattern {}: {}", pattern, e);
            None
        }
    }
}

fn compile_entries(patterns: &[(&str, &str)], case_insensitive: bool) -> Vec<CatalogEntry> {
    patterns
        .iter()
        .filter_map(|(label, pattern)| {
            compile_pattern(pattern, case_insensitive).map(|regex| CatalogEntry {
                label: label.to_string(),
                regex,
            })
        })
        .collect()
}

/// Compile the full catalog.
pub fn load_catalog() -> PatternCatalog {
    let credentials = get_credential_patterns()
        .into_iter()
        .filter_map(|pattern| compile_pattern(pattern, true))
        .collect();

    let env_usage = get_env_usage_patterns()
        .into_iter()
        .filter_map(|pattern| compile_pattern(pattern, false))
        .collect();

    PatternCatalog {
        llm_libraries: compile_entries(&get_llm_patterns(), true),
        frameworks: compile_entries(&get_framework_patterns(), true),
        credentials,
        env_usage,
        architecture: compile_entries(&get_architecture_patterns(), false),
    }
}

lazy_static! {
    /// Precompiled catalog shared by every analysis run
    pub static ref CATALOG: PatternCatalog = load_catalog();
}

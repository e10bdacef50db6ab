use crate::error::Result;
use crate::llm::prompts::hs_code_question;
use crate::llm::{require_bracketed, ChatModel, RetryPolicy};
use crate::translate::Translator;
use log::info;

/// Cleans the bracketed code from a model reply: `"[151.319]"` -> `"151319"`.
pub fn parse_hs_code(reply: &str) -> Result<String> {
    let code = require_bracketed(reply, "HS code")?;
    Ok(code.replace('.', ""))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProduct {
    pub english_name: String,
    pub hs_code: String,
}

/// Looks up the 6-digit HS code of a product named in any language the
/// translator understands.
pub async fn resolve_hs_code(
    product: &str,
    translator: &dyn Translator,
    model: &dyn ChatModel,
    retry: &RetryPolicy,
) -> Result<ResolvedProduct> {
    let english_name = translator.translate(product).await?;
    let reply = retry.invoke(model, &hs_code_question(&english_name)).await?;
    let hs_code = parse_hs_code(&reply)?;
    info!("Resolved HS code {} for '{}' ({})", hs_code, product, english_name);
    Ok(ResolvedProduct {
        english_name,
        hs_code,
    })
}

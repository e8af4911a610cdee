//! Storefront GraphQL endpoint construction from a configured shop domain.

use crate::error::CatalogError;

/// Builds `https://{domain}/api/{version}/graphql.json`.
///
/// `shop_domain` may be a bare host (`demo.myshopify.com`) or a full URL
/// (`https://demo.myshopify.com/collections/all`); only the host is kept.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidShopDomain`] if no host can be extracted.
pub fn storefront_endpoint(shop_domain: &str, api_version: &str) -> Result<String, CatalogError> {
    let host = extract_host(shop_domain)?;
    let version = api_version.trim().trim_matches('/');
    Ok(format!("https://{host}/api/{version}/graphql.json"))
}

/// Host (and port, if any) of `shop_domain`.
pub(crate) fn extract_host(shop_domain: &str) -> Result<String, CatalogError> {
    let trimmed = shop_domain.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let url = reqwest::Url::parse(&with_scheme).map_err(|e| CatalogError::InvalidShopDomain {
        shop_domain: shop_domain.to_owned(),
        reason: e.to_string(),
    })?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        }),
        _ => Err(CatalogError::InvalidShopDomain {
            shop_domain: shop_domain.to_owned(),
            reason: "no host".to_owned(),
        }),
    }
}

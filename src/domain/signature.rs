//! 微信支付 V2 签名
//!
//! 下单签名：字段名按字典序升序拼接为 `k=v&`，末尾追加 `key=<商户密钥>`，再做摘要。
//! 调起支付签名（paySign）：固定使用 appId、nonceStr、package、signType、timeStamp
//! 五个字段，按此字面顺序拼接。

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::SignType;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

/// 生成待签名字符串，跳过空值与 sign 字段
pub fn canonical_string(fields: &BTreeMap<String, String>, key: &str) -> String {
    let mut canonical = String::new();

    for (name, value) in fields {
        if name == "sign" || value.is_empty() {
            continue;
        }
        canonical.push_str(name);
        canonical.push('=');
        canonical.push_str(value);
        canonical.push('&');
    }

    canonical.push_str("key=");
    canonical.push_str(key);
    canonical
}

/// 计算摘要，小写十六进制
pub fn digest(sign_type: SignType, message: &str, key: &str) -> DomainResult<String> {
    match sign_type {
        SignType::Md5 => Ok(hex::encode(Md5::digest(message.as_bytes()))),
        SignType::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(key.as_bytes())
                .map_err(|e| DomainError::CryptoError(format!("HMAC init error: {}", e)))?;
            mac.update(message.as_bytes());
            Ok(hex::encode(mac.finalize().into_bytes()))
        }
    }
}

/// 计算字段签名
pub fn sign(
    fields: &BTreeMap<String, String>,
    key: &str,
    sign_type: SignType,
) -> DomainResult<String> {
    digest(sign_type, &canonical_string(fields, key), key)
}

/// 计算调起支付签名（MD5）
pub fn pay_sign(app_id: &str, nonce_str: &str, package: &str, time_stamp: &str, key: &str) -> String {
    let message = format!(
        "appId={}&nonceStr={}&package={}&signType={}&timeStamp={}&key={}",
        app_id,
        nonce_str,
        package,
        SignType::Md5,
        time_stamp,
        key
    );
    hex::encode(Md5::digest(message.as_bytes()))
}

/// 校验报文中的 sign 字段，签名类型取自 sign_type 字段（缺省为 MD5）
pub fn verify(fields: &BTreeMap<String, String>, key: &str) -> DomainResult<bool> {
    let provided = match fields.get("sign") {
        Some(sign) if !sign.is_empty() => sign,
        _ => return Ok(false),
    };

    let sign_type = match fields.get("sign_type") {
        Some(value) if !value.is_empty() => value.parse()?,
        _ => SignType::Md5,
    };

    let expected = sign(fields, key, sign_type)?;
    Ok(expected.eq_ignore_ascii_case(provided))
}

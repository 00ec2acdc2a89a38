//! 微信支付 V2 的扁平 XML 报文编解码
//!
//! 报文形如 `<xml><name><![CDATA[value]]></name>...</xml>`，只有一层子元素。

use crate::domain::errors::{DomainError, DomainResult};
use std::collections::BTreeMap;

/// 编码为 XML，字段按名称顺序输出，值放入 CDATA
pub fn encode(fields: &BTreeMap<String, String>) -> String {
    let mut xml = String::from("<xml>");

    for (name, value) in fields {
        xml.push('<');
        xml.push_str(name);
        xml.push_str("><![CDATA[");
        // CDATA 内不能出现 "]]>"
        xml.push_str(&value.replace("]]>", "]]]]><![CDATA[>"));
        xml.push_str("]]></");
        xml.push_str(name);
        xml.push('>');
    }

    xml.push_str("</xml>");
    xml
}

/// 解码为字段表
pub fn decode(xml: &str) -> DomainResult<BTreeMap<String, String>> {
    serde_xml_rs::from_str(xml.trim()).map_err(|e| DomainError::XmlError(e.to_string()))
}

use crate::domain::entities::{ClientPaymentParams, OrderRequest, SignedGatewayPayload};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::signature;
use crate::domain::value_objects::{Secret, SignType};
use std::collections::BTreeMap;

const SUCCESS: &str = "SUCCESS";

/// 统一下单构造器
///
/// 负责下单报文签名、网关响应解析以及调起支付参数的二次签名。
/// 网关调用本身由应用层通过 `WeChatPayPort` 完成。
pub struct PaymentOrderBuilder<'a> {
    secret_key: &'a Secret,
}

impl<'a> PaymentOrderBuilder<'a> {
    pub fn new(secret_key: &'a Secret) -> Self {
        Self { secret_key }
    }

    /// 校验订单并生成带 MD5 签名的网关报文
    pub fn sign_order(&self, order: &OrderRequest) -> DomainResult<SignedGatewayPayload> {
        order.validate()?;

        let fields = order.to_gateway_fields();
        let sign = signature::sign(&fields, self.secret_key.expose(), SignType::Md5)?;

        Ok(SignedGatewayPayload::new(fields, sign))
    }

    /// 从统一下单响应中取出 prepay_id
    pub fn extract_prepay_id(response: &BTreeMap<String, String>) -> DomainResult<String> {
        let field = |name: &str| field_value(response, name);

        if field("return_code") != SUCCESS {
            let message = match field("return_msg") {
                "" => "gateway returned no return_msg",
                msg => msg,
            };
            return Err(DomainError::OrderConstructionFailed(message.to_string()));
        }

        if field("result_code") != SUCCESS {
            let message = [field("err_code_des"), field("err_code")]
                .into_iter()
                .find(|v| !v.is_empty())
                .unwrap_or("gateway returned result_code FAIL");
            return Err(DomainError::OrderConstructionFailed(message.to_string()));
        }

        match field("prepay_id") {
            "" => Err(DomainError::OrderConstructionFailed(
                "Missing prepay_id".to_string(),
            )),
            prepay_id => Ok(prepay_id.to_string()),
        }
    }

    /// 生成客户端调起支付参数
    pub fn client_params(
        &self,
        app_id: &str,
        prepay_id: &str,
        nonce_str: &str,
        time_stamp: &str,
    ) -> ClientPaymentParams {
        let package = format!("prepay_id={}", prepay_id);
        let pay_sign = signature::pay_sign(
            app_id,
            nonce_str,
            &package,
            time_stamp,
            self.secret_key.expose(),
        );

        ClientPaymentParams {
            app_id: app_id.to_string(),
            time_stamp: time_stamp.to_string(),
            nonce_str: nonce_str.to_string(),
            package,
            sign_type: SignType::Md5.to_string(),
            pay_sign,
        }
    }
}

fn field_value<'r>(response: &'r BTreeMap<String, String>, name: &str) -> &'r str {
    response.get(name).map(String::as_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Money, TradeType};

    fn sample_order() -> OrderRequest {
        OrderRequest {
            app_id: "wx1".to_string(),
            mch_id: "mch1".to_string(),
            nonce_str: "abc123".to_string(),
            body: "t".to_string(),
            attach: None,
            out_trade_no: "o1".to_string(),
            total_fee: Money::from_cents(1),
            notify_url: "https://x".to_string(),
            openid: None,
            trade_type: TradeType::Jsapi,
            spbill_create_ip: None,
        }
    }

    fn response(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_sign_order_end_to_end_fixture() {
        let key = Secret::new("k1");
        let payload = PaymentOrderBuilder::new(&key)
            .sign_order(&sample_order())
            .unwrap();

        // md5("appid=wx1&body=t&mch_id=mch1&nonce_str=abc123&notify_url=https://x&out_trade_no=o1&total_fee=1&trade_type=JSAPI&key=k1")
        assert_eq!(payload.sign(), "77e40abee625ce890837457ab7ec1b93");
        assert_eq!(payload.fields().len(), 8);

        let wire = payload.to_wire_fields();
        assert_eq!(
            wire.get("sign").map(String::as_str),
            Some("77e40abee625ce890837457ab7ec1b93")
        );
    }

    #[test]
    fn test_sign_order_rejects_invalid_order() {
        let key = Secret::new("k1");
        let mut order = sample_order();
        order.app_id.clear();

        let result = PaymentOrderBuilder::new(&key).sign_order(&order);
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_extract_prepay_id_success() {
        let prepay_id = PaymentOrderBuilder::extract_prepay_id(&response(&[
            ("return_code", "SUCCESS"),
            ("result_code", "SUCCESS"),
            ("prepay_id", "wx201410272009395522657a690389285100"),
        ]))
        .unwrap();

        assert_eq!(prepay_id, "wx201410272009395522657a690389285100");
    }

    #[test]
    fn test_extract_prepay_id_return_code_fail() {
        let err = PaymentOrderBuilder::extract_prepay_id(&response(&[
            ("return_code", "FAIL"),
            ("return_msg", "签名错误"),
        ]))
        .unwrap_err();

        assert_eq!(err.to_string(), "Order construction failed: 签名错误");
    }

    #[test]
    fn test_extract_prepay_id_result_code_fail() {
        let err = PaymentOrderBuilder::extract_prepay_id(&response(&[
            ("return_code", "SUCCESS"),
            ("result_code", "FAIL"),
            ("err_code", "ORDERPAID"),
            ("err_code_des", "该订单已支付"),
        ]))
        .unwrap_err();

        assert_eq!(err.to_string(), "Order construction failed: 该订单已支付");
    }

    #[test]
    fn test_extract_prepay_id_missing() {
        let err = PaymentOrderBuilder::extract_prepay_id(&response(&[
            ("return_code", "SUCCESS"),
            ("result_code", "SUCCESS"),
        ]))
        .unwrap_err();

        assert!(matches!(err, DomainError::OrderConstructionFailed(_)));
    }

    #[test]
    fn test_client_params_pay_sign() {
        let key = Secret::new("k1");
        let params = PaymentOrderBuilder::new(&key).client_params(
            "wx1",
            "wx20161110163838f231619da20804912345",
            "abc123",
            "1478766919",
        );

        assert_eq!(params.package, "prepay_id=wx20161110163838f231619da20804912345");
        assert_eq!(params.sign_type, "MD5");
        assert_eq!(params.pay_sign, "a8d479cb3798853bad95e3ff6a075317");
    }
}

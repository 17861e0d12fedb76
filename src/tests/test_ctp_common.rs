#[cfg(test)]
mod tests {
    use crate::core::common::{Direction, Offset, OrderType, ProductType};
    use crate::core::ctp::common::{
        from_ctp_direction, from_ctp_offset, from_ctp_product_class, gb2312_to_utf8, is_error_rsp,
        parse_order_ref, rsp_error_msg, to_ctp_direction, to_ctp_offset, to_ctp_price_type,
        RspInfoField, CTP_PRICE_ANY, CTP_PRICE_BEST, CTP_PRICE_LIMIT, CTP_PRODUCT_FUTURES,
        CTP_PRODUCT_OPTIONS,
    };

    #[test]
    fn gb2312_payloads_decode_to_utf8() {
        // "已成交"
        assert_eq!(gb2312_to_utf8(&[0xD2, 0xD1, 0xB3, 0xC9, 0xBD, 0xBB]), "已成交");
        // ASCII passes through untouched.
        assert_eq!(gb2312_to_utf8(b"order rejected"), "order rejected");
        assert_eq!(gb2312_to_utf8(b""), "");
    }

    #[test]
    fn malformed_gb2312_is_replaced_not_fatal() {
        let decoded = gb2312_to_utf8(&[0xFF, 0xFF, b'o', b'k']);
        assert!(decoded.ends_with("ok"));
        assert!(decoded.contains('\u{FFFD}'));
    }

    #[test]
    fn order_refs_round_trip_as_decimal_ascii() {
        for order_ref in [1i32, 7, 42, 100_000, i32::MAX] {
            let wire = order_ref.to_string();
            assert_eq!(parse_order_ref(&wire).unwrap(), order_ref);
            // Exact round trip: no padding, no whitespace.
            assert_eq!(parse_order_ref(&wire).unwrap().to_string(), wire);
        }
    }

    #[test]
    fn bad_order_refs_are_errors() {
        assert!(parse_order_ref("").is_err());
        assert!(parse_order_ref("12a").is_err());
        assert!(parse_order_ref(" 12").is_err());
        assert!(parse_order_ref("99999999999999999999").is_err());
    }

    #[test]
    fn direction_and_offset_codes_round_trip() {
        for direction in [Direction::Buy, Direction::Sell] {
            assert_eq!(
                from_ctp_direction(to_ctp_direction(direction)),
                Some(direction)
            );
        }
        for offset in [
            Offset::Open,
            Offset::Close,
            Offset::CloseToday,
            Offset::CloseYesterday,
        ] {
            assert_eq!(from_ctp_offset(to_ctp_offset(offset)), Some(offset));
        }
        assert_eq!(from_ctp_direction(b'9'), None);
        assert_eq!(from_ctp_offset(b'9'), None);
    }

    #[test]
    fn price_type_mapping_matches_the_wire_contract() {
        assert_eq!(to_ctp_price_type(OrderType::Market), CTP_PRICE_ANY);
        assert_eq!(to_ctp_price_type(OrderType::Limit), CTP_PRICE_LIMIT);
        // FAK/FOK ride on a limit price; the time/volume conditions differ.
        assert_eq!(to_ctp_price_type(OrderType::Fak), CTP_PRICE_LIMIT);
        assert_eq!(to_ctp_price_type(OrderType::Fok), CTP_PRICE_LIMIT);
        assert_eq!(to_ctp_price_type(OrderType::Best), CTP_PRICE_BEST);
    }

    #[test]
    fn product_class_mapping() {
        assert_eq!(
            from_ctp_product_class(CTP_PRODUCT_FUTURES),
            ProductType::Future
        );
        assert_eq!(
            from_ctp_product_class(CTP_PRODUCT_OPTIONS),
            ProductType::Option
        );
    }

    #[test]
    fn error_responses_are_detected_and_decoded() {
        assert!(!is_error_rsp(None));
        assert!(!is_error_rsp(Some(&RspInfoField::default())));

        let rsp = RspInfoField {
            error_id: 3,
            error_msg: vec![0xD2, 0xD1, 0xB3, 0xC9, 0xBD, 0xBB],
        };
        assert!(is_error_rsp(Some(&rsp)));
        assert_eq!(rsp_error_msg(Some(&rsp)), "已成交");
        assert_eq!(rsp_error_msg(None), "");
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::core::ctp::api::{LoginStep, TestRequest, TraderSpi};
    use crate::core::ctp::common::{
        CtpOrderStatus, CtpSubmitStatus, InputOrderActionField, InputOrderField,
        InvestorPositionField, OrderField, RspInfoField, TradingAccountField,
        CTP_POSI_DIRECTION_LONG, CTP_POSI_DIRECTION_SHORT,
    };
    use crate::tests::helpers::{
        accepted_status_field, emissions, instrument_field, logged_in_fixture, order_req,
        order_status_field, test_config, trade_api_fixture, trade_field, Emission, TEST_INVESTOR,
    };

    fn reject_rsp() -> RspInfoField {
        RspInfoField {
            error_id: 42,
            error_msg: b"rejected".to_vec(),
        }
    }

    fn cancel_status_field(order_ref: i32, original: i32, traded: i32) -> OrderField {
        order_status_field(
            order_ref,
            CtpSubmitStatus::Accepted,
            CtpOrderStatus::Canceled,
            original,
            traded,
        )
    }

    //==============================================================================================
    // Login sequencer.

    #[test]
    fn login_runs_the_full_handshake() {
        let (trade_api, api, _wrapper, _table) = trade_api_fixture();
        let mut config = test_config();
        config.auth_code = "0000".to_string();
        config.cancel_outstanding_orders_on_startup = true;

        assert!(trade_api.login(&config));
        assert!(trade_api.is_logon());

        let requests = api.requests();
        assert_eq!(requests.len(), 6);
        assert!(matches!(requests[0], TestRequest::Connect(_)));
        assert!(matches!(requests[1], TestRequest::Authenticate(_)));
        assert!(matches!(requests[2], TestRequest::Login(_)));
        assert!(matches!(requests[3], TestRequest::QrySettlementInfo(_)));
        assert!(matches!(requests[4], TestRequest::SettlementConfirm(_)));
        assert!(matches!(requests[5], TestRequest::QryOrder(_)));
    }

    #[test]
    fn login_skips_authentication_without_auth_code() {
        let (trade_api, api, _wrapper, _table) = trade_api_fixture();
        assert!(trade_api.login(&test_config()));

        let requests = api.requests();
        assert_eq!(requests.len(), 4);
        assert!(matches!(requests[0], TestRequest::Connect(_)));
        assert!(matches!(requests[1], TestRequest::Login(_)));
        assert!(matches!(requests[2], TestRequest::QrySettlementInfo(_)));
        assert!(matches!(requests[3], TestRequest::SettlementConfirm(_)));
    }

    #[test]
    fn login_aborts_on_the_failing_step() {
        let steps = [
            LoginStep::Connect,
            LoginStep::Authenticate,
            LoginStep::Login,
            LoginStep::SettlementQuery,
            LoginStep::SettlementConfirm,
            LoginStep::OrderQuery,
        ];
        for step in steps {
            let (trade_api, api, _wrapper, _table) = trade_api_fixture();
            api.set_fail_step(Some(step));
            let mut config = test_config();
            config.auth_code = "0000".to_string();
            config.cancel_outstanding_orders_on_startup = true;

            assert!(!trade_api.login(&config), "login survived failing {:?}", step);
            assert!(!trade_api.is_logon());
        }
    }

    #[test]
    fn login_aborts_when_a_request_is_refused() {
        let (trade_api, api, _wrapper, _table) = trade_api_fixture();
        api.set_ret_code(-1);
        assert!(!trade_api.login(&test_config()));
        assert!(!trade_api.is_logon());
    }

    #[test]
    fn login_twice_is_rejected() {
        let (trade_api, _api, _wrapper, _table) = logged_in_fixture();
        assert!(!trade_api.login(&test_config()));
        // The session from the first login survives.
        assert!(trade_api.is_logon());
    }

    #[test]
    fn logout_clears_the_session() {
        let (trade_api, api, _wrapper, _table) = logged_in_fixture();
        trade_api.logout();
        assert!(!trade_api.is_logon());
        assert!(api
            .requests()
            .iter()
            .any(|r| matches!(r, TestRequest::Logout(_))));
    }

    //==============================================================================================
    // Order refs.

    #[test]
    fn order_refs_are_seeded_from_login_and_strictly_increasing() {
        let (trade_api, api, _wrapper, _table) = trade_api_fixture();
        api.set_max_order_ref("41");
        assert!(trade_api.login(&test_config()));

        let refs: Vec<u64> = (0..3)
            .map(|_| trade_api.send_order(&order_req(1, 100.0)))
            .collect();
        assert_eq!(refs, vec![42, 43, 44]);

        let inserts = api.order_inserts();
        let wire_refs: Vec<&str> = inserts.iter().map(|i| i.order_ref.as_str()).collect();
        assert_eq!(wire_refs, vec!["42", "43", "44"]);
    }

    #[test]
    fn send_order_requires_login() {
        let (trade_api, api, _wrapper, _table) = trade_api_fixture();
        assert_eq!(trade_api.send_order(&order_req(1, 100.0)), 0);
        assert!(api.order_inserts().is_empty());
    }

    #[test]
    fn send_order_rejects_unknown_contract() {
        let (trade_api, api, _wrapper, _table) = logged_in_fixture();
        let mut req = order_req(1, 100.0);
        req.ticker_index = 999;
        assert_eq!(trade_api.send_order(&req), 0);
        assert!(api.order_inserts().is_empty());
    }

    #[test]
    fn send_order_returns_zero_when_the_front_refuses() {
        let (trade_api, api, _wrapper, _table) = logged_in_fixture();
        api.set_ret_code(-1);
        assert_eq!(trade_api.send_order(&order_req(1, 100.0)), 0);
        assert_eq!(trade_api.live_order_count(), 0);
    }

    //==============================================================================================
    // State machine scenarios.

    #[test]
    fn happy_path_fill_in_two_trades() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        trade_api.on_rtn_order(&accepted_status_field(r, 10));
        trade_api.on_rtn_trade(&trade_field(r, 4, 100.0));
        trade_api.on_rtn_trade(&trade_field(r, 6, 100.0));

        assert_eq!(
            emissions(&wrapper),
            vec![
                Emission::Accepted(order_ref),
                Emission::Traded(order_ref, 4, 100.0),
                Emission::Traded(order_ref, 6, 100.0),
            ]
        );
        assert_eq!(trade_api.live_order_count(), 0);
    }

    #[test]
    fn trade_arriving_before_status_still_acks_once() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        // The fill beats the status report.
        trade_api.on_rtn_trade(&trade_field(r, 4, 100.0));
        trade_api.on_rtn_order(&order_status_field(
            r,
            CtpSubmitStatus::Accepted,
            CtpOrderStatus::PartTradedQueueing,
            10,
            4,
        ));
        trade_api.on_rtn_trade(&trade_field(r, 6, 100.0));

        let accepted = emissions(&wrapper)
            .iter()
            .filter(|e| matches!(e, Emission::Accepted(_)))
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(
            emissions(&wrapper)[0],
            Emission::Accepted(order_ref),
            "acceptance must precede the first fill"
        );
        assert_eq!(trade_api.live_order_count(), 0);
    }

    #[test]
    fn partial_fill_then_cancel() {
        let (trade_api, api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        trade_api.on_rtn_order(&accepted_status_field(r, 10));
        trade_api.on_rtn_trade(&trade_field(r, 3, 100.0));

        assert!(trade_api.cancel_order(order_ref));
        let actions = api.order_actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].order_ref, r.to_string());
        assert_eq!(actions[0].instrument_id, "rb2009");

        trade_api.on_rtn_order(&cancel_status_field(r, 10, 3));

        assert_eq!(
            emissions(&wrapper),
            vec![
                Emission::Accepted(order_ref),
                Emission::Traded(order_ref, 3, 100.0),
                Emission::Canceled(order_ref, 7),
            ]
        );
        assert_eq!(trade_api.live_order_count(), 0);
    }

    #[test]
    fn cancel_before_exchange_acceptance_fails() {
        let (trade_api, api, _wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));

        assert!(!trade_api.cancel_order(order_ref));
        assert!(api.order_actions().is_empty());
    }

    #[test]
    fn cancel_of_unknown_ref_fails() {
        let (trade_api, api, _wrapper, _table) = logged_in_fixture();
        assert!(!trade_api.cancel_order(777));
        assert!(api.order_actions().is_empty());
    }

    #[test]
    fn duplicate_cancel_terminal_emits_once() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        trade_api.on_rtn_order(&accepted_status_field(r, 10));
        trade_api.on_rtn_order(&cancel_status_field(r, 10, 0));
        trade_api.on_rtn_order(&cancel_status_field(r, 10, 0));

        let count = emissions(&wrapper)
            .iter()
            .filter(|e| matches!(e, Emission::Canceled(..)))
            .count();
        assert_eq!(count, 1);
        assert!(emissions(&wrapper).contains(&Emission::Canceled(order_ref, 10)));
        assert_eq!(trade_api.live_order_count(), 0);
    }

    #[test]
    fn late_trade_after_cancel_is_still_counted() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        trade_api.on_rtn_order(&accepted_status_field(r, 10));
        trade_api.on_rtn_trade(&trade_field(r, 3, 100.0));
        // The broker knows of 5 traded lots when it confirms the cancel; the
        // fifth and fourth lots' trade report is still in flight.
        trade_api.on_rtn_order(&cancel_status_field(r, 10, 5));
        assert_eq!(trade_api.live_order_count(), 1);
        // Duplicate cancel notice while waiting: swallowed.
        trade_api.on_rtn_order(&cancel_status_field(r, 10, 5));

        trade_api.on_rtn_trade(&trade_field(r, 2, 100.0));

        assert_eq!(
            emissions(&wrapper),
            vec![
                Emission::Accepted(order_ref),
                Emission::Traded(order_ref, 3, 100.0),
                Emission::Canceled(order_ref, 5),
                Emission::Traded(order_ref, 2, 100.0),
            ]
        );
        assert_eq!(trade_api.live_order_count(), 0);
    }

    #[test]
    fn insert_reject_from_the_front_is_terminal() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));

        let field = InputOrderField {
            investor_id: TEST_INVESTOR.to_string(),
            instrument_id: "rb2009".to_string(),
            exchange_id: "SHFE".to_string(),
            order_ref: order_ref.to_string(),
            ..Default::default()
        };
        trade_api.on_rsp_order_insert(Some(&field), Some(&reject_rsp()), 1, true);

        assert_eq!(emissions(&wrapper), vec![Emission::Rejected(order_ref)]);
        assert_eq!(trade_api.live_order_count(), 0);

        // Any further report for the dead ref is dropped.
        trade_api.on_rtn_order(&accepted_status_field(order_ref as i32, 10));
        assert_eq!(emissions(&wrapper), vec![Emission::Rejected(order_ref)]);
    }

    #[test]
    fn exchange_reject_via_status_is_terminal() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        trade_api.on_rtn_order(&order_status_field(
            r,
            CtpSubmitStatus::InsertRejected,
            CtpOrderStatus::NoTradeNotQueueing,
            10,
            0,
        ));

        assert_eq!(emissions(&wrapper), vec![Emission::Rejected(order_ref)]);
        assert_eq!(trade_api.live_order_count(), 0);
    }

    #[test]
    fn cancel_reject_via_status_keeps_the_order_live() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        trade_api.on_rtn_order(&accepted_status_field(r, 10));
        trade_api.on_rtn_order(&order_status_field(
            r,
            CtpSubmitStatus::CancelRejected,
            CtpOrderStatus::NoTradeQueueing,
            10,
            0,
        ));

        assert_eq!(
            emissions(&wrapper),
            vec![
                Emission::Accepted(order_ref),
                Emission::CancelRejected(order_ref),
            ]
        );
        assert_eq!(trade_api.live_order_count(), 1);

        // The order can still trade out.
        trade_api.on_rtn_trade(&trade_field(r, 10, 100.0));
        assert_eq!(trade_api.live_order_count(), 0);
    }

    #[test]
    fn cancel_reject_via_action_response() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        trade_api.on_rtn_order(&accepted_status_field(r, 10));

        let action = InputOrderActionField {
            investor_id: TEST_INVESTOR.to_string(),
            instrument_id: "rb2009".to_string(),
            exchange_id: "SHFE".to_string(),
            order_ref: r.to_string(),
            ..Default::default()
        };
        trade_api.on_rsp_order_action(Some(&action), Some(&reject_rsp()), 2, true);

        assert_eq!(
            emissions(&wrapper),
            vec![
                Emission::Accepted(order_ref),
                Emission::CancelRejected(order_ref),
            ]
        );
        assert_eq!(trade_api.live_order_count(), 1);
    }

    #[test]
    fn broker_accepted_but_not_at_exchange_emits_nothing() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        for status in [CtpOrderStatus::Unknown, CtpOrderStatus::NoTradeNotQueueing] {
            trade_api.on_rtn_order(&order_status_field(
                r,
                CtpSubmitStatus::InsertSubmitted,
                status,
                10,
                0,
            ));
        }

        assert!(emissions(&wrapper).is_empty());
        assert!(!trade_api.cancel_order(order_ref));
    }

    #[test]
    fn foreign_investor_reports_are_dropped() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        let mut status = accepted_status_field(r, 10);
        status.investor_id = "999999".to_string();
        trade_api.on_rtn_order(&status);

        let mut trade = trade_field(r, 4, 100.0);
        trade.investor_id = "999999".to_string();
        trade_api.on_rtn_trade(&trade);

        assert!(emissions(&wrapper).is_empty());
        assert_eq!(trade_api.live_order_count(), 1);
    }

    #[test]
    fn reports_for_unknown_refs_are_dropped() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();

        trade_api.on_rtn_order(&accepted_status_field(404, 10));
        trade_api.on_rtn_trade(&trade_field(404, 4, 100.0));

        assert!(emissions(&wrapper).is_empty());
    }

    #[test]
    fn overflowing_trade_is_counted_and_closes_the_order() {
        let (trade_api, _api, wrapper, _table) = logged_in_fixture();
        let order_ref = trade_api.send_order(&order_req(10, 100.0));
        let r = order_ref as i32;

        trade_api.on_rtn_order(&accepted_status_field(r, 10));
        trade_api.on_rtn_trade(&trade_field(r, 12, 100.0));

        assert_eq!(
            emissions(&wrapper),
            vec![
                Emission::Accepted(order_ref),
                Emission::Traded(order_ref, 12, 100.0),
            ]
        );
        assert_eq!(trade_api.live_order_count(), 0);
    }

    #[test]
    fn startup_sweep_cancels_queueing_orders_by_sys_id() {
        let (trade_api, api, wrapper, _table) = trade_api_fixture();
        let mut legacy = order_status_field(
            3,
            CtpSubmitStatus::Accepted,
            CtpOrderStatus::PartTradedQueueing,
            10,
            4,
        );
        legacy.order_sys_id = "      505044".to_string();
        let done = order_status_field(
            4,
            CtpSubmitStatus::Accepted,
            CtpOrderStatus::AllTraded,
            5,
            5,
        );
        api.set_outstanding_orders(vec![legacy, done]);

        let mut config = test_config();
        config.cancel_outstanding_orders_on_startup = true;
        assert!(trade_api.login(&config));

        // Only the queueing order is swept, by its exchange order id.
        let actions = api.order_actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].order_sys_id, "      505044");
        assert_eq!(actions[0].order_ref, "");

        // The cancel terminal for the legacy ref lands after login: warn and
        // drop, nothing reaches the wrapper.
        trade_api.on_rtn_order(&cancel_status_field(3, 10, 4));
        assert!(emissions(&wrapper).is_empty());
    }

    //==============================================================================================
    // Queries.

    #[test]
    fn query_contracts_streams_every_instrument() {
        let (trade_api, api, wrapper, _table) = logged_in_fixture();
        api.set_instruments(vec![
            instrument_field("rb2009", "SHFE"),
            instrument_field("cu2007", "SHFE"),
        ]);

        assert!(trade_api.query_contracts());

        let contracts = &wrapper.lock().unwrap().contracts;
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].ticker, "rb2009");
        assert_eq!(contracts[0].size, 10);
        assert_eq!(contracts[1].ticker, "cu2007");
    }

    #[test]
    fn contract_names_are_decoded_from_gb2312() {
        let (trade_api, api, wrapper, _table) = logged_in_fixture();
        let mut instrument = instrument_field("rb2009", "SHFE");
        // "螺纹钢" in GB2312.
        instrument.instrument_name = vec![0xC2, 0xDD, 0xCE, 0xC6, 0xB8, 0xD6];
        api.set_instruments(vec![instrument]);

        assert!(trade_api.query_contract("rb2009", "SHFE"));
        assert_eq!(wrapper.lock().unwrap().contracts[0].name, "螺纹钢");
    }

    #[test]
    fn query_contract_with_no_match_fails() {
        let (trade_api, _api, _wrapper, _table) = logged_in_fixture();
        assert!(!trade_api.query_contracts());
    }

    #[test]
    fn query_account_reports_once() {
        let (trade_api, api, wrapper, _table) = logged_in_fixture();
        api.set_account(TradingAccountField {
            account_id: "5500".to_string(),
            balance: 1_000_000.0,
            frozen_cash: 10.0,
            frozen_margin: 20.0,
            frozen_commission: 2.5,
        });

        assert!(trade_api.query_account());

        let accounts = &wrapper.lock().unwrap().accounts;
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_id, 5500);
        assert_eq!(accounts[0].balance, 1_000_000.0);
        assert_eq!(accounts[0].frozen, 32.5);
    }

    #[test]
    fn query_position_populates_both_legs() {
        let (trade_api, api, wrapper, _table) = logged_in_fixture();
        api.set_positions(vec![
            InvestorPositionField {
                instrument_id: "rb2009".to_string(),
                posi_direction: CTP_POSI_DIRECTION_LONG,
                position: 10,
                today_position: 4,
                long_frozen: 2,
                position_cost: 350_000.0,
                position_profit: 1500.0,
                ..Default::default()
            },
            InvestorPositionField {
                instrument_id: "rb2009".to_string(),
                posi_direction: CTP_POSI_DIRECTION_SHORT,
                position: 5,
                today_position: 5,
                short_frozen: 1,
                position_cost: 180_000.0,
                position_profit: -300.0,
                ..Default::default()
            },
        ]);

        assert!(trade_api.query_positions());

        let positions = &wrapper.lock().unwrap().positions;
        assert_eq!(positions.len(), 1);
        let pos = &positions[0];
        assert_eq!(pos.ticker_index, 0);
        assert_eq!(pos.long_pos.holdings, 10);
        assert_eq!(pos.long_pos.yd_holdings, 6);
        assert_eq!(pos.long_pos.frozen, 2);
        assert_eq!(pos.long_pos.float_pnl, 1500.0);
        // 350_000 / (10 lots * multiplier 10)
        assert_eq!(pos.long_pos.cost_price, 3500.0);
        assert_eq!(pos.short_pos.holdings, 5);
        assert_eq!(pos.short_pos.yd_holdings, 0);
        assert_eq!(pos.short_pos.frozen, 1);
    }

    #[test]
    fn query_trades_skips_unknown_contracts() {
        let (trade_api, api, wrapper, _table) = logged_in_fixture();
        let mut known = trade_field(1, 4, 100.0);
        known.instrument_id = "rb2009".to_string();
        let mut unknown = trade_field(2, 1, 50.0);
        unknown.instrument_id = "zz9999".to_string();
        api.set_trades(vec![known, unknown]);

        assert!(trade_api.query_trades());

        let trades = &wrapper.lock().unwrap().trades;
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].ticker_index, 0);
        assert_eq!(trades[0].volume, 4);
    }

    #[test]
    fn query_margin_rate_updates_the_sealed_table() {
        use crate::core::ctp::common::InstrumentMarginRateField;

        let (trade_api, api, _wrapper, table) = logged_in_fixture();
        api.set_margin_rates(vec![InstrumentMarginRateField {
            instrument_id: "rb2009".to_string(),
            long_margin_ratio_by_money: 0.10,
            short_margin_ratio_by_money: 0.11,
        }]);

        assert!(trade_api.query_margin_rate("rb2009"));
        assert_eq!(table.margin_rate(0), Some((0.10, 0.11)));
    }

    #[test]
    fn queries_require_login() {
        let (trade_api, _api, _wrapper, _table) = trade_api_fixture();
        assert!(!trade_api.query_contracts());
        assert!(!trade_api.query_positions());
        assert!(!trade_api.query_account());
        assert!(!trade_api.query_trades());
        assert!(!trade_api.query_margin_rate("rb2009"));
    }

    //==============================================================================================
    // Quantified invariants under randomized interleavings.

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Conservation, acceptance-once and cancel idempotence hold for any
        /// split of fills around a (possibly duplicated) cancel terminal.
        #[test]
        fn fill_cancel_interleavings_hold_invariants(
            fills in prop::collection::vec(1..5i32, 1..6),
            remainder in 1..5i32,
            cancel_pos in 0usize..6,
            duplicate_cancel in proptest::bool::ANY,
        ) {
            let (trade_api, _api, wrapper, _table) = logged_in_fixture();
            let total: i32 = fills.iter().sum();
            let original = total + remainder;

            let order_ref = trade_api.send_order(&order_req(original, 100.0));
            let r = order_ref as i32;
            trade_api.on_rtn_order(&accepted_status_field(r, original));

            let cancel_pos = cancel_pos.min(fills.len());
            let mut fired_cancel = false;
            for (i, fill) in fills.iter().enumerate() {
                if i == cancel_pos {
                    trade_api.on_rtn_order(&cancel_status_field(r, original, total));
                    if duplicate_cancel {
                        trade_api.on_rtn_order(&cancel_status_field(r, original, total));
                    }
                    fired_cancel = true;
                }
                trade_api.on_rtn_trade(&trade_field(r, *fill, 100.0));
            }
            if !fired_cancel {
                trade_api.on_rtn_order(&cancel_status_field(r, original, total));
                if duplicate_cancel {
                    trade_api.on_rtn_order(&cancel_status_field(r, original, total));
                }
            }

            let emitted = emissions(&wrapper);
            let accepted = emitted.iter().filter(|e| matches!(e, Emission::Accepted(_))).count();
            let canceled: Vec<i32> = emitted.iter().filter_map(|e| match e {
                Emission::Canceled(_, v) => Some(*v),
                _ => None,
            }).collect();
            let traded: i32 = emitted.iter().filter_map(|e| match e {
                Emission::Traded(_, v, _) => Some(*v),
                _ => None,
            }).sum();

            prop_assert_eq!(accepted, 1);
            prop_assert_eq!(canceled, vec![remainder]);
            prop_assert_eq!(traded, total);
            prop_assert_eq!(trade_api.live_order_count(), 0);
        }
    }
}

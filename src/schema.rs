diesel::table! {
    irp_accounts (id) {
        id -> Text,
        customer_id -> Text,
        account_number -> Text,
        bank_code -> Text,
        risk_profile -> Text,
        auto_rebalance -> Integer,
        is_active -> Integer,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    holdings (id) {
        id -> Text,
        customer_id -> Text,
        account_id -> Text,
        sleeve -> Text,
        instrument_code -> Nullable<Text>,
        instrument_name -> Nullable<Text>,
        units -> Nullable<Text>,
        purchase_amount -> Text,
        current_value -> Text,
        current_nav -> Nullable<Text>,
        purchase_nav -> Nullable<Text>,
        interest_rate -> Nullable<Text>,
        maturity_date -> Nullable<Text>,
        total_return -> Text,
        return_rate -> Text,
        status -> Text,
        synced_at -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    rebalancing_jobs (id) {
        id -> Text,
        customer_id -> Text,
        account_number -> Text,
        job_type -> Text,
        trigger_type -> Text,
        status -> Text,
        current_snapshot -> Nullable<Text>,
        target_snapshot -> Nullable<Text>,
        order_plan -> Nullable<Text>,
        total_fee -> Text,
        failure_reason -> Nullable<Text>,
        cancel_reason -> Nullable<Text>,
        created_at -> Text,
        approved_at -> Nullable<Text>,
        executed_at -> Nullable<Text>,
        completed_at -> Nullable<Text>,
        cancelled_at -> Nullable<Text>,
    }
}

diesel::table! {
    rebalancing_orders (id) {
        id -> Text,
        job_id -> Text,
        order_type -> Text,
        asset_type -> Text,
        fund_code -> Text,
        fund_name -> Text,
        class_code -> Nullable<Text>,
        expected_nav -> Text,
        filled_nav -> Nullable<Text>,
        order_units -> Text,
        order_amount -> Text,
        filled_units -> Nullable<Text>,
        filled_amount -> Nullable<Text>,
        fee -> Text,
        fee_type -> Nullable<Text>,
        status -> Text,
        bank_order_id -> Nullable<Text>,
        execution_reason -> Nullable<Text>,
        filled_at -> Nullable<Text>,
        failed_at -> Nullable<Text>,
        failure_reason -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::joinable!(rebalancing_orders -> rebalancing_jobs (job_id));

diesel::allow_tables_to_appear_in_same_query!(
    irp_accounts,
    holdings,
    rebalancing_jobs,
    rebalancing_orders,
);

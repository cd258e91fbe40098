mod holdings_model_tests;

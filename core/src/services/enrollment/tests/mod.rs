mod throttle_tests;

mod assigner_tests;

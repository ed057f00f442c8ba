mod test_type_expressions;

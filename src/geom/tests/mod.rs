mod test_interpolate_basic;

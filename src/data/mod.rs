pub mod sprinkler_types;

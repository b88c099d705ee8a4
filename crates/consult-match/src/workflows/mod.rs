pub mod matchability;

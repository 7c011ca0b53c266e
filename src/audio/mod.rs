pub mod ambient_bank;

pub mod alias_record;

pub mod restaurant_table;

pub use restaurant_table::Entity as RestaurantTable;

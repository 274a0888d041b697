mod pagination_test;
mod repository_modification_test;
mod repository_negative_test;
mod repository_search_test;

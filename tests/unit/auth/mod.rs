// Auth unit tests
